use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Auto,
    Locked,
}

/// Where a click on the overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupTarget {
    Backdrop,
    Content,
    CloseButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub title: String,
    pub body_markup: String,
    pub visible: bool,
}

/// The single reusable article overlay.
#[derive(Debug)]
pub struct Popup {
    overlay: Option<Overlay>,
    scroll: ScrollState,
    constructions: usize,
}

impl Default for Popup {
    fn default() -> Self {
        Self {
            overlay: None,
            scroll: ScrollState::Auto,
            constructions: 0,
        }
    }
}

impl Popup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `title` and `body_markup`, building the overlay on first use and
    /// replacing its contents afterwards.
    pub fn open(&mut self, title: &str, body_markup: &str) {
        let constructions = &mut self.constructions;
        let overlay = self.overlay.get_or_insert_with(|| {
            *constructions += 1;
            debug!("Constructing article overlay");
            Overlay {
                title: String::new(),
                body_markup: String::new(),
                visible: false,
            }
        });

        overlay.title = title.to_string();
        overlay.body_markup = body_markup.to_string();
        overlay.visible = true;
        self.scroll = ScrollState::Locked;
    }

    pub fn close(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.visible = false;
            self.scroll = ScrollState::Auto;
        }
    }

    pub fn click(&mut self, target: PopupTarget) {
        match target {
            PopupTarget::Backdrop | PopupTarget::CloseButton => self.close(),
            PopupTarget::Content => {}
        }
    }

    pub fn is_open(&self) -> bool {
        self.overlay.as_ref().is_some_and(|o| o.visible)
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn constructions(&self) -> usize {
        self.constructions
    }
}
