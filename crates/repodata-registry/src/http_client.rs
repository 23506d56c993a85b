//! Process-wide HTTP agent used for repodata requests.

use std::{
    sync::{LazyLock, RwLock},
    time::Duration,
};

use ureq::Agent;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: Some(format!("conda-repodata/{}", env!("CARGO_PKG_VERSION"))),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Builds an HTTP `Agent` from this configuration.
    ///
    /// Non-2xx responses are returned as regular responses so callers can
    /// report the status together with the URL.
    pub fn build(&self) -> Agent {
        let mut config = Agent::config_builder()
            .timeout_global(self.timeout)
            .http_status_as_error(false);

        if let Some(user_agent) = &self.user_agent {
            config = config.user_agent(user_agent);
        }

        config.build().into()
    }
}

struct SharedClient {
    agent: Agent,
    config: ClientConfig,
}

static SHARED_CLIENT: LazyLock<RwLock<SharedClient>> = LazyLock::new(|| {
    let config = ClientConfig::default();
    let agent = config.build();
    RwLock::new(SharedClient {
        agent,
        config,
    })
});

/// Returns a handle to the shared agent. Agents are cheap to clone and share
/// their connection pool.
pub fn shared_agent() -> Agent {
    SHARED_CLIENT.read().unwrap().agent.clone()
}

/// Reconfigures the shared agent. Subsequent [`shared_agent`] calls observe the change.
pub fn configure_http_client<F>(f: F)
where
    F: FnOnce(&mut ClientConfig),
{
    let mut state = SHARED_CLIENT.write().unwrap();
    let mut config = state.config.clone();
    f(&mut config);
    state.agent = config.build();
    state.config = config;
}
