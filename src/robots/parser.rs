//! robots.txt rules
//!
//! Allow/Disallow matching is delegated to the `robotstxt` crate (a port of
//! Google's matcher); `Crawl-delay`, which that matcher ignores, is read here.

use robotstxt::DefaultMatcher;

/// Rules for one origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRobots {
    rules: Rules,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rules {
    /// Everything is allowed (no robots.txt, or fail-open policy)
    AllowAll,
    /// Everything is disallowed (fail-closed policy)
    DisallowAll,
    /// Raw robots.txt content, matched on demand
    Content(String),
}

impl ParsedRobots {
    /// Wraps a robots.txt body; a blank body allows everything
    pub fn from_content(content: &str) -> Self {
        if content.trim().is_empty() {
            return Self::allow_all();
        }
        Self {
            rules: Rules::Content(content.to_string()),
        }
    }

    /// Rules for a site without robots.txt, or an unreachable one under the
    /// fail-open policy
    pub fn allow_all() -> Self {
        Self {
            rules: Rules::AllowAll,
        }
    }

    /// Rules for an unreachable robots.txt under the fail-closed policy
    pub fn disallow_all() -> Self {
        Self {
            rules: Rules::DisallowAll,
        }
    }

    /// Returns the raw robots.txt content, if any was parsed
    pub fn content(&self) -> Option<&str> {
        match &self.rules {
            Rules::Content(content) => Some(content),
            _ => None,
        }
    }

    /// Returns true if `agent` (a product token such as "RAG-Course-Scraper")
    /// may fetch the absolute `url`
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match &self.rules {
            Rules::AllowAll => true,
            Rules::DisallowAll => false,
            Rules::Content(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, url)
            }
        }
    }

    /// Returns the `Crawl-delay` (in seconds) that applies to `user_agent`
    ///
    /// A group naming the agent (case-insensitive product token) takes
    /// precedence over the `*` group. Unparseable values are ignored.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let content = self.content()?;
        let agent = user_agent.to_ascii_lowercase();

        let mut group: Vec<String> = Vec::new();
        let mut reading_agents = false;
        let mut for_agent = None;
        let mut for_any = None;

        for (name, value) in content.lines().filter_map(directive) {
            if name == "user-agent" {
                // Consecutive user-agent lines share one group
                if !reading_agents {
                    group.clear();
                }
                group.push(value.to_ascii_lowercase());
                reading_agents = true;
                continue;
            }
            reading_agents = false;

            if name != "crawl-delay" {
                continue;
            }
            let Ok(delay) = value.parse::<f64>() else {
                continue;
            };

            if group.iter().any(|ua| *ua == agent) {
                for_agent.get_or_insert(delay);
            } else if group.iter().any(|ua| ua == "*") {
                for_any.get_or_insert(delay);
            }
        }

        for_agent.or(for_any)
    }
}

/// Splits a robots.txt line into its lowercase directive name and value
fn directive(line: &str) -> Option<(String, &str)> {
    let line = line.split('#').next().unwrap_or("").trim();
    let (name, value) = line.split_once(':')?;
    Some((name.trim().to_ascii_lowercase(), value.trim()))
}
