//! Navigation shell: active page plus the two collapsible panels.
//!
//! All transitions are pure functions on values. Closing panels animate over
//! a fixed number of ticks, driven by the UI's tick timer.

use std::fmt;

/// Ticks a panel spends in `Closing` before it is `Closed`.
pub const CLOSE_TICKS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    ClinicalQuery,
    DrugInteractions,
    Guidelines,
    KnowledgeRepository,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::ClinicalQuery,
        Page::DrugInteractions,
        Page::Guidelines,
        Page::KnowledgeRepository,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::ClinicalQuery => "Clinical Query",
            Page::DrugInteractions => "Drug Interactions",
            Page::Guidelines => "Guidelines",
            Page::KnowledgeRepository => "Knowledge Repository",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Page::ClinicalQuery => 0,
            Page::DrugInteractions => 1,
            Page::Guidelines => 2,
            Page::KnowledgeRepository => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Page> {
        Page::ALL.get(index).copied()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Open,
    Closing { ticks_left: u8 },
    Closed,
}

impl PanelState {
    /// Open a closed panel; start closing an open one. A closing panel
    /// re-opens.
    pub fn toggle(self) -> Self {
        match self {
            PanelState::Closed | PanelState::Closing { .. } => PanelState::Open,
            PanelState::Open => PanelState::Closing {
                ticks_left: CLOSE_TICKS,
            },
        }
    }

    pub fn tick(self) -> Self {
        match self {
            PanelState::Closing { ticks_left } if ticks_left > 1 => PanelState::Closing {
                ticks_left: ticks_left - 1,
            },
            PanelState::Closing { .. } => PanelState::Closed,
            other => other,
        }
    }

    /// Whether anything of the panel is drawn.
    pub fn is_visible(self) -> bool {
        !matches!(self, PanelState::Closed)
    }

    /// Fraction of full width to draw, 1.0 when open and 0.0 when closed.
    pub fn openness(self) -> f32 {
        match self {
            PanelState::Open => 1.0,
            PanelState::Closing { ticks_left } => {
                f32::from(ticks_left) / f32::from(CLOSE_TICKS + 1)
            }
            PanelState::Closed => 0.0,
        }
    }
}

/// Top-level navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shell {
    pub active_page: Page,
    pub sidebar: PanelState,
    pub user_menu: PanelState,
}

impl Shell {
    pub fn new() -> Self {
        Self {
            active_page: Page::default(),
            sidebar: PanelState::Open,
            user_menu: PanelState::Closed,
        }
    }

    /// Switch pages. Returns the page being left when the page changed, so
    /// the caller can discard that page's transient state.
    pub fn navigate(&mut self, page: Page) -> Option<Page> {
        if page == self.active_page {
            return None;
        }
        let leaving = self.active_page;
        self.active_page = page;
        self.user_menu = close(self.user_menu);
        Some(leaving)
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar = self.sidebar.toggle();
    }

    pub fn toggle_user_menu(&mut self) {
        self.user_menu = self.user_menu.toggle();
    }

    pub fn tick(&mut self) {
        self.sidebar = self.sidebar.tick();
        self.user_menu = self.user_menu.tick();
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

/// Start closing if open; leave other states alone.
fn close(panel: PanelState) -> PanelState {
    match panel {
        PanelState::Open => panel.toggle(),
        other => other,
    }
}
