//! Default view selection read when a controller is created.

use pennywise_shared::config::ViewConfig;
use pennywise_shared::types::{Segment, SortMode};

/// Source of the user's preferred view defaults.
pub trait ViewPreferences: Send + Sync {
    /// Segment a new view opens on.
    fn default_segment(&self) -> Segment;

    /// Sort mode a new view opens with.
    fn default_sort(&self) -> SortMode;
}

impl ViewPreferences for ViewConfig {
    fn default_segment(&self) -> Segment {
        self.default_segment
    }

    fn default_sort(&self) -> SortMode {
        self.default_sort
    }
}
