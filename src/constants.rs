//! Application constants.
//!
//! Centralizes timing and layout values for better maintainability.

/// Presenter timing constants, in milliseconds.
pub mod timing {
    /// Delay before the first paragraph container starts its entrance.
    pub const PARAGRAPH_START_DELAY_MS: u64 = 200;

    /// Delay between consecutive paragraph containers.
    pub const PARAGRAPH_STAGGER_MS: u64 = 1500;

    /// Delay before profile cards start animating on the entered slide.
    pub const PROFILE_ANIMATE_IN_MS: u64 = 300;

    /// Delay before profile cards stop animating on the slide just left.
    pub const PROFILE_ANIMATE_OUT_MS: u64 = 600;

    /// How long the jump field shows its error border.
    pub const JUMP_ERROR_FLASH_MS: u64 = 300;

    /// Slide timer resolution.
    pub const TIMER_TICK_MS: u64 = 1000;

    /// Default terminal event poll interval.
    pub const DEFAULT_POLL_MS: u64 = 50;
}

/// Async task constants.
pub mod async_tasks {
    /// Channel buffer size for async task communication.
    pub const CHANNEL_BUFFER_SIZE: usize = 10;
}

/// Diagram geometry shared by the dendrogram-based renderers.
pub mod diagram {
    /// Horizontal extent given to the dendrogram before distance scaling.
    pub const DENDRO_WIDTH: f64 = 150.0;

    /// Side of one heatmap cell in the cluster glyph diagram.
    pub const CELL_SIZE: f64 = 20.0;

    /// Width reserved between the heatmap and the glyph clusters.
    pub const GLYPH_WIDTH: f64 = 500.0;

    /// Extra width reserved for the glyph clusters.
    pub const CLUSTER_WIDTH: f64 = 500.0;

    /// Number of colour stops in a legend gradient.
    pub const LEGEND_STOPS: usize = 101;
}

/// UI layout constants.
pub mod ui {
    /// Height of the bottom status bar including borders.
    pub const STATUS_BAR_HEIGHT: u16 = 3;

    /// Width of the prev/next button labels.
    pub const NAV_BUTTON_WIDTH: u16 = 8;

    /// Width of the jump-to-slide field.
    pub const JUMP_FIELD_WIDTH: u16 = 12;
}
