//! Mount point handed to island widgets
//!
//! The host owns the container, sizes it during layout, copies its buffer to
//! the frame and forwards input through [`Container::dispatch`]. The island
//! draws into the buffer and registers listeners; nothing else crosses the
//! boundary.

use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Input forwarded from the host to a mounted island
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IslandEvent {
    Focus,
    Blur,
    Key(KeyEvent),
    /// The host changed the container size; the island should redraw
    Resize,
}

/// Identifies a listener registered on a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&IslandEvent) -> bool>;

struct ContainerInner {
    buffer: Buffer,
    listeners: BTreeMap<ListenerId, Listener>,
    next_listener_id: u64,
}

#[derive(Clone)]
pub struct Container {
    inner: Rc<RefCell<ContainerInner>>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Container")
            .field("area", &inner.buffer.area)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ContainerInner {
                buffer: Buffer::empty(Rect::default()),
                listeners: BTreeMap::new(),
                next_listener_id: 0,
            })),
        }
    }

    /// Local drawing area (origin at 0,0)
    #[cfg(test)]
    pub fn area(&self) -> Rect {
        self.inner.borrow().buffer.area
    }

    /// Set the container size. Dispatches [`IslandEvent::Resize`] when it changed.
    pub fn resize(&self, width: u16, height: u16) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            let area = Rect::new(0, 0, width, height);
            if inner.buffer.area == area {
                return false;
            }
            inner.buffer = Buffer::empty(area);
        }
        self.dispatch(&IslandEvent::Resize);
        true
    }

    /// Redraw the container contents. The buffer is cleared first.
    pub fn draw(&self, paint: impl FnOnce(Rect, &mut Buffer)) {
        let mut inner = self.inner.borrow_mut();
        let area = inner.buffer.area;
        inner.buffer.reset();
        paint(area, &mut inner.buffer);
    }

    /// Blank the container (used after an island is destroyed)
    pub fn clear(&self) {
        self.inner.borrow_mut().buffer.reset();
    }

    /// Copy the container contents onto `target` at `area`
    pub fn blit(&self, target: &mut Buffer, area: Rect) {
        let inner = self.inner.borrow();
        let source = &inner.buffer;
        let width = area.width.min(source.area.width);
        let height = area.height.min(source.area.height);
        for y in 0..height {
            for x in 0..width {
                let Some(cell) = source.cell((x, y)) else {
                    continue;
                };
                if let Some(dest) = target.cell_mut((area.x + x, area.y + y)) {
                    *dest = cell.clone();
                }
            }
        }
    }

    /// Text content of one row
    #[cfg(test)]
    pub fn row_text(&self, row: u16) -> String {
        let inner = self.inner.borrow();
        (0..inner.buffer.area.width)
            .filter_map(|x| inner.buffer.cell((x, row)).map(|c| c.symbol().to_string()))
            .collect()
    }

    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&IslandEvent) -> bool + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_listener_id);
        inner.next_listener_id += 1;
        inner.listeners.insert(id, Rc::new(listener));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Deliver an event to every listener. Returns true if any consumed it.
    pub fn dispatch(&self, event: &IslandEvent) -> bool {
        let listeners: Vec<(ListenerId, Listener)> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(id, l)| (*id, Rc::clone(l)))
            .collect();

        let mut consumed = false;
        for (id, listener) in listeners {
            let live = self.inner.borrow().listeners.contains_key(&id);
            if live {
                consumed |= listener(event);
            }
        }
        consumed
    }
}
