/*
  Minuet, a bitboard chess engine with a neural evaluation boundary.
  Copyright (C) 2024 The Minuet Authors.

  Minuet is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Minuet is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! Search limiting.
//!
//! A search must stop when its wall-clock budget runs out, and every worker
//! must observe that stop promptly.
//! The limit is a monotonic deadline plus a shared stop flag; workers sample
//! it on every recursive search call and terminate cooperatively within one
//! node of the deadline passing.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Instant,
};

#[derive(Debug)]
/// A limit on how long a search may run, shared by every worker of that
/// search.
pub struct SearchLimit {
    /// Whether the search is over, either because the deadline passed or
    /// because it was stopped explicitly.
    over: AtomicBool,
    /// The instant past which the search must stop.
    /// `None` means the search is untimed.
    deadline: Option<Instant>,
}

impl SearchLimit {
    #[must_use]
    /// Create a limit which never expires on its own.
    /// Used for the synchronous first iteration, which must complete so that
    /// a finished depth always exists.
    pub fn infinite() -> SearchLimit {
        SearchLimit {
            over: AtomicBool::new(false),
            deadline: None,
        }
    }

    #[must_use]
    /// Create a limit which expires at the given instant.
    pub fn until(deadline: Instant) -> SearchLimit {
        SearchLimit {
            over: AtomicBool::new(false),
            deadline: Some(deadline),
        }
    }

    /// Immediately mark the search as over.
    pub fn stop(&self) {
        self.over.store(true, Ordering::Relaxed);
    }

    #[must_use]
    /// Poll whether the search is over, without sampling the clock.
    pub fn is_over(&self) -> bool {
        self.over.load(Ordering::Relaxed)
    }

    #[must_use]
    /// Sample the clock, marking the search over if the deadline has passed,
    /// and report whether the search is over.
    pub fn check_time(&self) -> bool {
        if self.over.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.over.store(true, Ordering::Relaxed);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn infinite_never_expires() {
        let limit = SearchLimit::infinite();
        assert!(!limit.check_time());
        assert!(!limit.is_over());
    }

    #[test]
    fn stop_is_observed() {
        let limit = SearchLimit::infinite();
        limit.stop();
        assert!(limit.is_over());
        assert!(limit.check_time());
    }

    #[test]
    fn past_deadline_expires() {
        let limit = SearchLimit::until(Instant::now() - Duration::from_millis(1));
        assert!(limit.check_time());
        assert!(limit.is_over());
    }
}
