use std::collections::{HashMap, VecDeque};
use std::env;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::user;

pub type Limiter = Arc<SlidingWindow>;

/// Rate-limited kinds of user action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    CreateThread,
    SendMessage,
}

impl Action {
    pub const fn as_str(&self) -> &str {
        match self {
            Self::CreateThread => "create_thread",
            Self::SendMessage => "send_message",
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub cap: usize,
    pub window: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cap: 30,
            window: Duration::from_secs(60),
        }
    }
}

impl Config {
    pub fn env() -> Option<Self> {
        let cap = env::var("RATE_LIMIT_CAP").ok()?.parse().ok()?;
        let window_secs = env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .ok()?;

        Some(Self {
            cap,
            window: Duration::from_secs(window_secs),
        })
    }
}

/// Sliding-window counter keyed by `(user, action)`: at most `cap` actions
/// within any trailing `window`.
pub struct SlidingWindow {
    config: Config,
    hits: Mutex<HashMap<(user::Id, Action), VecDeque<Instant>>>,
}

impl SlidingWindow {
    pub fn new(config: Config) -> Arc<Self> {
        Self {
            config,
            hits: Mutex::new(HashMap::new()),
        }
        .into()
    }

    pub fn check(&self, user: &user::Id, action: Action) -> std::result::Result<(), Error> {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);
        let window = hits.entry((user.to_owned(), action)).or_default();

        while window
            .front()
            .is_some_and(|hit| now.duration_since(*hit) > self.config.window)
        {
            window.pop_front();
        }

        if window.len() >= self.config.cap {
            return Err(Error::Exceeded(action));
        }

        window.push_back(now);
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("rate limit exceeded for {}", .0.as_str())]
    Exceeded(Action),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(cap: usize, window: Duration) -> Limiter {
        SlidingWindow::new(Config { cap, window })
    }

    #[test]
    fn allows_up_to_cap_within_window() {
        let limiter = limiter(2, Duration::from_secs(60));
        let alice = user::Id::from("alice");

        assert!(limiter.check(&alice, Action::CreateThread).is_ok());
        assert!(limiter.check(&alice, Action::CreateThread).is_ok());
        assert!(limiter.check(&alice, Action::CreateThread).is_err());
    }

    #[test]
    fn users_and_actions_are_tracked_independently() {
        let limiter = limiter(1, Duration::from_secs(60));
        let alice = user::Id::from("alice");
        let bob = user::Id::from("bob");

        assert!(limiter.check(&alice, Action::CreateThread).is_ok());
        assert!(limiter.check(&alice, Action::SendMessage).is_ok());
        assert!(limiter.check(&bob, Action::CreateThread).is_ok());
        assert!(limiter.check(&alice, Action::CreateThread).is_err());
    }

    #[test]
    fn window_expiry_frees_capacity() {
        let limiter = limiter(1, Duration::from_millis(20));
        let alice = user::Id::from("alice");

        assert!(limiter.check(&alice, Action::SendMessage).is_ok());
        assert!(limiter.check(&alice, Action::SendMessage).is_err());

        std::thread::sleep(Duration::from_millis(30));

        assert!(limiter.check(&alice, Action::SendMessage).is_ok());
    }
}
