//! Page navigation: the editor's single page and the preview's spreads.
//!
//! A page change is two-step. [`PageNavigator::request_page`] enters a
//! short-lived flipping state and tells the host how long to wait; the
//! host's timer then calls [`PageNavigator::complete_flip`], which commits
//! the target only if it still exists.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FlipDirection {
    Next,
    Prev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Flip {
    pub direction: FlipDirection,
    pub target: usize,
}

/// Number of two-page spreads for `page_count` pages.
pub fn spread_count(page_count: usize) -> usize {
    page_count.div_ceil(2)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageNavigator {
    current_page: usize,
    /// First page of the preview spread; always even.
    spread_start: usize,
    flip: Option<Flip>,
    flip_duration_ms: u32,
}

impl PageNavigator {
    pub fn new(flip_duration_ms: u32) -> Self {
        Self {
            current_page: 0,
            spread_start: 0,
            flip: None,
            flip_duration_ms,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn flip(&self) -> Option<Flip> {
        self.flip
    }

    pub fn is_flipping(&self) -> bool {
        self.flip.is_some()
    }

    /// Back to the first page and spread (a different scrapbook was opened).
    pub fn reset(&mut self) {
        self.current_page = 0;
        self.spread_start = 0;
        self.flip = None;
    }

    // ─── Editor pages ────────────────────────────────────────────────────

    /// Ask to show page `index`. Out of range or already current is a no-op
    /// (`None`); otherwise the flip starts and its duration is returned.
    /// A second request before completion retargets the running flip.
    pub fn request_page(&mut self, index: i64, page_count: usize) -> Option<u32> {
        let Ok(target) = usize::try_from(index) else {
            log::debug!("page {index} requested; ignoring");
            return None;
        };
        if target >= page_count || target == self.current_page {
            log::debug!("page {target} of {page_count} requested from {}; ignoring", self.current_page);
            return None;
        }
        let direction = if target > self.current_page {
            FlipDirection::Next
        } else {
            FlipDirection::Prev
        };
        self.flip = Some(Flip { direction, target });
        Some(self.flip_duration_ms)
    }

    pub fn next_page(&mut self, page_count: usize) -> Option<u32> {
        self.request_page(self.current_page as i64 + 1, page_count)
    }

    pub fn prev_page(&mut self, page_count: usize) -> Option<u32> {
        self.request_page(self.current_page as i64 - 1, page_count)
    }

    /// Timer callback. Commits the pending target if the page still exists
    /// and clears the flipping state either way. Returns whether the current
    /// page changed.
    pub fn complete_flip(&mut self, page_count: usize) -> bool {
        let Some(flip) = self.flip.take() else {
            return false;
        };
        if flip.target < page_count {
            self.current_page = flip.target;
            true
        } else {
            log::debug!("flip target {} vanished ({page_count} pages left)", flip.target);
            self.clamp(page_count);
            false
        }
    }

    /// Keep indices valid after pages were removed.
    pub fn clamp(&mut self, page_count: usize) {
        let last = page_count.saturating_sub(1);
        self.current_page = self.current_page.min(last);
        if self.spread_start >= page_count {
            self.spread_start = last - last % 2;
        }
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 0
    }

    pub fn has_next_page(&self, page_count: usize) -> bool {
        self.current_page + 1 < page_count
    }

    // ─── Preview spreads ─────────────────────────────────────────────────

    pub fn spread_start(&self) -> usize {
        self.spread_start
    }

    /// Index of the active spread (for the dot indicator).
    pub fn active_spread(&self) -> usize {
        self.spread_start / 2
    }

    /// Left and (if present) right page of the active spread.
    pub fn spread_pages(&self, page_count: usize) -> (usize, Option<usize>) {
        let right = self.spread_start + 1;
        (self.spread_start, (right < page_count).then_some(right))
    }

    pub fn has_prev_spread(&self) -> bool {
        self.spread_start > 0
    }

    pub fn has_next_spread(&self, page_count: usize) -> bool {
        self.spread_start + 2 < page_count
    }

    pub fn next_spread(&mut self, page_count: usize) -> bool {
        if self.has_next_spread(page_count) {
            self.spread_start += 2;
            true
        } else {
            false
        }
    }

    pub fn prev_spread(&mut self) -> bool {
        if self.has_prev_spread() {
            self.spread_start -= 2;
            true
        } else {
            false
        }
    }

    pub fn jump_to_spread(&mut self, spread: usize, page_count: usize) -> bool {
        if spread < spread_count(page_count) {
            self.spread_start = spread * 2;
            true
        } else {
            false
        }
    }
}

impl Default for PageNavigator {
    fn default() -> Self {
        Self::new(400)
    }
}
