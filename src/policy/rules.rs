//! Parsed robots.txt rules.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use texting_robots::Robot;
use tracing::warn;

/// A robots.txt body with its per-agent matchers.
///
/// `texting_robots` binds a matcher to one user agent, so matchers are
/// compiled on first use for each agent and kept alongside the body. An
/// agent whose matcher fails to compile is treated as unrestricted.
pub struct RuleSet {
    body: String,
    robots: Mutex<HashMap<String, Option<Robot>>>,
}

impl RuleSet {
    pub fn parse(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            robots: Mutex::new(HashMap::new()),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether `user_agent` may fetch `url` (absolute URL or path).
    pub fn is_allowed(&self, user_agent: &str, url: &str) -> bool {
        let Ok(mut robots) = self.robots.lock() else {
            return true;
        };
        let robot = robots
            .entry(user_agent.to_string())
            .or_insert_with(|| match Robot::new(user_agent, self.body.as_bytes()) {
                Ok(robot) => Some(robot),
                Err(e) => {
                    warn!(user_agent, error = %e, "Unparseable robots.txt; allowing");
                    None
                }
            });
        robot.as_ref().is_none_or(|robot| robot.allowed(url))
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("bytes", &self.body.len())
            .finish()
    }
}
