//! Change notification for the active project's mark list.
//!
//! Listeners run synchronously, in registration order, after each mutation.
//! There is no unsubscribe: listeners live as long as the API that owns them.

use std::fmt;

/// What a mutation did to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Added(usize),
    Removed(usize),
    Cleared,
    /// The whole list was rewritten from the list editor.
    Replaced,
    /// A cursor position was recorded (or recording was attempted).
    CursorStored,
    Placed(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub project: String,
    pub kind: ChangeKind,
}

pub type Listener = Box<dyn FnMut(&ChangeEvent)>;

#[derive(Default)]
pub struct Listeners {
    listeners: Vec<Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_changed<F>(&mut self, listener: F)
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: &ChangeEvent) {
        for listener in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(kind: ChangeKind) -> ChangeEvent {
        ChangeEvent {
            project: "/p".to_string(),
            kind,
        }
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            listeners.on_changed(move |e| log.borrow_mut().push((name, e.kind.clone())));
        }

        listeners.emit(&event(ChangeKind::Added(1)));
        listeners.emit(&event(ChangeKind::Cleared));

        assert_eq!(
            *log.borrow(),
            vec![
                ("first", ChangeKind::Added(1)),
                ("second", ChangeKind::Added(1)),
                ("third", ChangeKind::Added(1)),
                ("first", ChangeKind::Cleared),
                ("second", ChangeKind::Cleared),
                ("third", ChangeKind::Cleared),
            ]
        );
    }

    #[test]
    fn emitting_without_listeners_is_fine() {
        let mut listeners = Listeners::new();
        assert!(listeners.is_empty());
        listeners.emit(&event(ChangeKind::Replaced));
    }
}
