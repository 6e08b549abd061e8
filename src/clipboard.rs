use tracing::debug;

/// System clipboard with an in-process fallback for headless sessions.
pub struct Clipboard {
    system: Option<arboard::Clipboard>,
    fallback: Option<String>,
}

impl Clipboard {
    pub fn new() -> Self {
        match arboard::Clipboard::new() {
            Ok(clipboard) => Self {
                system: Some(clipboard),
                fallback: None,
            },
            Err(e) => {
                debug!(error = %e, "system clipboard unavailable");
                Self::internal()
            }
        }
    }

    /// Clipboard that never touches the system one.
    pub fn internal() -> Self {
        Self {
            system: None,
            fallback: None,
        }
    }

    pub fn set_text(&mut self, text: String) {
        if let Some(system) = self.system.as_mut() {
            if let Err(e) = system.set_text(text.clone()) {
                debug!(error = %e, "failed to write system clipboard");
            }
        }
        self.fallback = Some(text);
    }

    pub fn get_text(&mut self) -> Option<String> {
        if let Some(system) = self.system.as_mut() {
            match system.get_text() {
                Ok(text) => return Some(text),
                Err(e) => debug!(error = %e, "failed to read system clipboard"),
            }
        }
        self.fallback.clone()
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}
