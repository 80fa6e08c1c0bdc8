use crate::types::SidebarViewState;

/// Viewports narrower than this use the mobile overlay instead of a docked
/// sidebar.
pub const DESKTOP_BREAKPOINT: f64 = 1024.0;

pub fn is_mobile(viewport_width: f64) -> bool {
    viewport_width < DESKTOP_BREAKPOINT
}

/// Left offset of the main content area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MainOffset {
    /// Full sidebar width.
    Sidebar,
    /// Narrow icon rail of a collapsed sidebar.
    IconRail,
    None,
}

impl MainOffset {
    pub fn css(self) -> &'static str {
        match self {
            MainOffset::Sidebar => "20vw",
            MainOffset::IconRail => "80px",
            MainOffset::None => "0",
        }
    }
}

/// Everything the renderer needs to lay out the sidebar frame, derived from
/// the view state, viewport and route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SidebarLayout {
    pub main_offset: MainOffset,
    pub labels_visible: bool,
    pub overlay_visible: bool,
    /// The button that opens the overlay exists only below the breakpoint.
    pub menu_visible: bool,
    pub collapse_title: &'static str,
    pub search_modal_left: &'static str,
}

impl SidebarLayout {
    pub fn compute(view: &SidebarViewState, viewport_width: f64, memory_route: bool) -> Self {
        let mobile = is_mobile(viewport_width);
        let main_offset = if mobile {
            MainOffset::None
        } else if !view.collapsed {
            MainOffset::Sidebar
        } else if memory_route {
            MainOffset::IconRail
        } else {
            MainOffset::None
        };

        Self {
            main_offset,
            labels_visible: !view.collapsed,
            overlay_visible: mobile && view.open,
            menu_visible: mobile,
            collapse_title: if view.collapsed {
                "Expand sidebar"
            } else {
                "Collapse sidebar"
            },
            search_modal_left: if !mobile && !view.collapsed {
                "calc((20vw + 100vw) / 2)"
            } else {
                "50%"
            },
        }
    }
}
