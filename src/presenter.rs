use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a result stays on screen
pub const DISMISS_AFTER: Duration = Duration::from_millis(2500);

/// Shows the landed sector and hides it again after a fixed delay.
///
/// Every display schedules its own dismissal and none is ever cancelled, so
/// a dismissal left over from an earlier display can hide a newer one early.
#[derive(Debug, Default)]
pub struct ResultPresenter {
    text: String,
    visible: bool,
    dismissals: VecDeque<Instant>,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, label: &str, now: Instant) {
        self.text = format!("Category: {label}");
        self.visible = true;
        self.dismissals.push_back(now + DISMISS_AFTER);
        tracing::info!(label, "result shown");
    }

    /// Fires every dismissal due by `now`. Returns whether anything fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut fired = false;
        while self.dismissals.front().is_some_and(|due| *due <= now) {
            self.dismissals.pop_front();
            self.visible = false;
            fired = true;
        }
        fired
    }

    /// Text on screen, if shown
    pub fn visible_text(&self) -> Option<&str> {
        self.visible.then_some(self.text.as_str())
    }

    /// Earliest pending dismissal
    pub fn next_deadline(&self) -> Option<Instant> {
        self.dismissals.front().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: Duration = Duration::from_millis(1);

    #[test]
    fn shows_label_with_prefix() {
        let mut presenter = ResultPresenter::new();
        assert_eq!(presenter.visible_text(), None);
        presenter.show("Science", Instant::now());
        assert_eq!(presenter.visible_text(), Some("Category: Science"));
    }

    #[test]
    fn dismisses_after_two_and_a_half_seconds() {
        let mut presenter = ResultPresenter::new();
        let t0 = Instant::now();
        presenter.show("Art", t0);

        assert!(!presenter.tick(t0 + DISMISS_AFTER - TOLERANCE));
        assert!(presenter.visible_text().is_some());
        assert!(presenter.tick(t0 + DISMISS_AFTER));
        assert_eq!(presenter.visible_text(), None);
        assert_eq!(presenter.next_deadline(), None);
    }

    #[test]
    fn earlier_dismissal_still_hides_a_newer_display() {
        let mut presenter = ResultPresenter::new();
        let t0 = Instant::now();
        presenter.show("Art", t0);
        presenter.show("History", t0 + Duration::from_secs(1));
        assert_eq!(presenter.visible_text(), Some("Category: History"));

        // the first display's timer fires on schedule and hides the second label
        assert!(presenter.tick(t0 + DISMISS_AFTER));
        assert_eq!(presenter.visible_text(), None);
        assert_eq!(
            presenter.next_deadline(),
            Some(t0 + Duration::from_secs(1) + DISMISS_AFTER)
        );

        assert!(presenter.tick(t0 + Duration::from_secs(1) + DISMISS_AFTER));
        assert_eq!(presenter.next_deadline(), None);
    }

    #[test]
    fn redisplay_after_dismissal_shows_again() {
        let mut presenter = ResultPresenter::new();
        let t0 = Instant::now();
        presenter.show("Art", t0);
        presenter.tick(t0 + DISMISS_AFTER);
        presenter.show("Sports", t0 + Duration::from_secs(3));
        assert_eq!(presenter.visible_text(), Some("Category: Sports"));
    }

    #[test]
    fn late_tick_fires_all_overdue_dismissals() {
        let mut presenter = ResultPresenter::new();
        let t0 = Instant::now();
        for i in 0..3 {
            presenter.show("Art", t0 + Duration::from_millis(i * 100));
        }
        assert!(presenter.tick(t0 + Duration::from_secs(10)));
        assert_eq!(presenter.next_deadline(), None);
    }
}
