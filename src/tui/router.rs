use crate::tui::sidebar::NavigationRequest;

/// In-process location provider: the current path plus a back stack.
#[derive(Debug, Clone)]
pub struct Router {
    current: String,
    history: Vec<String>,
}

impl Router {
    pub fn new(start: &str) -> Self {
        Router {
            current: normalize(start),
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Handle a navigation request. Returns the new path if it changed.
    pub fn navigate(&mut self, request: NavigationRequest) -> Option<&str> {
        let next = normalize(&request.0);
        if next == self.current {
            return None;
        }
        let prev = std::mem::replace(&mut self.current, next);
        self.history.push(prev);
        Some(&self.current)
    }

    /// Pop the back stack. Returns the new path if there was one.
    pub fn back(&mut self) -> Option<&str> {
        let prev = self.history.pop()?;
        self.current = prev;
        Some(&self.current)
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }
}

/// Paths are absolute; an empty path is the root.
fn normalize(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
