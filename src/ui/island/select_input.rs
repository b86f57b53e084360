//! Country select, built as an island
//!
//! Unlike the host widgets this one is retained-mode: it draws itself into
//! its container whenever the store notifies or an event arrives, and the
//! host only copies the result to the screen.

use super::adapter::{Island, IslandFactory, MountError};
use super::container::{Container, IslandEvent, ListenerId};
use crate::state::{country_name, FieldId, FormSnapshot, Store, Subscription, COUNTRIES};
use crate::ui::fields::FieldBinding;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

pub const ISLAND_NAME: &str = "select-input";

const ACCENT: Color = Color::LightRed;

/// Props accepted at mount time
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SelectProps {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_label() -> String {
    FieldId::Country.label().to_string()
}

fn default_placeholder() -> String {
    "Select your country".to_string()
}

impl Default for SelectProps {
    fn default() -> Self {
        Self {
            label: default_label(),
            placeholder: default_placeholder(),
        }
    }
}

impl SelectProps {
    pub fn to_value(&self) -> Value {
        json!({ "label": self.label, "placeholder": self.placeholder })
    }
}

/// Island-local interaction state
#[derive(Debug, Default)]
struct SelectState {
    focused: bool,
    open: bool,
    highlighted: usize,
}

struct SelectView {
    props: SelectProps,
    state: SelectState,
}

/// What a key press asks for once the local state is updated
enum Action {
    None,
    Redraw,
    Choose(&'static str),
}

pub struct SelectInput {
    container: Container,
    listener: Option<ListenerId>,
    subscription: Option<Subscription>,
}

/// Factory that mounts [`SelectInput`] bound to `store`'s country field
pub fn factory(store: Store) -> IslandFactory {
    IslandFactory::new(ISLAND_NAME, move |container, props| {
        let props: SelectProps =
            serde_json::from_value(props.clone()).map_err(|source| MountError::InvalidProps {
                island: ISLAND_NAME,
                source,
            })?;
        let island = SelectInput::create(container, props, store.clone());
        Ok(Box::new(island) as Box<dyn Island>)
    })
}

impl SelectInput {
    pub fn create(container: &Container, props: SelectProps, store: Store) -> Self {
        let binding = FieldBinding::new(store.clone(), FieldId::Country);
        let view = Rc::new(RefCell::new(SelectView {
            props,
            state: SelectState::default(),
        }));

        let subscription = {
            let view = Rc::clone(&view);
            let container = container.clone();
            store.subscribe(move |snapshot: &FormSnapshot| {
                paint(
                    &container,
                    &view.borrow(),
                    &snapshot.data.country,
                    &snapshot.errors.country,
                );
            })
        };

        let listener = {
            let view = Rc::clone(&view);
            let target = container.clone();
            container.add_listener(move |event| {
                let value = binding.value();
                let (consumed, action) = apply_event(&mut view.borrow_mut().state, event, &value);
                match action {
                    Action::None => {}
                    // The store notification repaints after a change
                    Action::Choose(code) => binding.change(code),
                    Action::Redraw => {
                        if matches!(event, IslandEvent::Blur) {
                            binding.blur();
                        }
                        paint(&target, &view.borrow(), &binding.value(), &binding.error());
                    }
                }
                consumed
            })
        };

        paint(
            container,
            &view.borrow(),
            &store.value(FieldId::Country),
            &store.error(FieldId::Country),
        );

        Self {
            container: container.clone(),
            listener: Some(listener),
            subscription: Some(subscription),
        }
    }
}

impl Island for SelectInput {
    fn destroy(&mut self) {
        if let Some(id) = self.listener.take() {
            self.container.remove_listener(id);
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl Drop for SelectInput {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn index_of(code: &str) -> Option<usize> {
    COUNTRIES.iter().position(|(c, _)| *c == code)
}

/// Update local state for `event`; returns (consumed, follow-up)
fn apply_event(state: &mut SelectState, event: &IslandEvent, current: &str) -> (bool, Action) {
    match event {
        IslandEvent::Focus => {
            state.focused = true;
            (false, Action::Redraw)
        }
        IslandEvent::Blur => {
            state.focused = false;
            state.open = false;
            (false, Action::Redraw)
        }
        IslandEvent::Resize => (false, Action::Redraw),
        IslandEvent::Key(key) => apply_key(state, *key, current),
    }
}

fn apply_key(state: &mut SelectState, key: KeyEvent, current: &str) -> (bool, Action) {
    let last = COUNTRIES.len() - 1;
    match (state.open, key.code) {
        (false, KeyCode::Enter | KeyCode::Char(' ')) => {
            state.open = true;
            state.highlighted = index_of(current).unwrap_or(0);
            (true, Action::Redraw)
        }
        (true, KeyCode::Enter | KeyCode::Char(' ')) => {
            state.open = false;
            (true, Action::Choose(COUNTRIES[state.highlighted].0))
        }
        (true, KeyCode::Esc) => {
            state.open = false;
            (true, Action::Redraw)
        }
        (true, KeyCode::Up | KeyCode::Char('k')) => {
            state.highlighted = if state.highlighted == 0 {
                last
            } else {
                state.highlighted - 1
            };
            (true, Action::Redraw)
        }
        (true, KeyCode::Down | KeyCode::Char('j')) => {
            state.highlighted = (state.highlighted + 1) % COUNTRIES.len();
            (true, Action::Redraw)
        }
        // Closed: arrows step through the options directly, like a native select
        (false, KeyCode::Up) => {
            let next = match index_of(current) {
                Some(0) | None => last,
                Some(i) => i - 1,
            };
            (true, Action::Choose(COUNTRIES[next].0))
        }
        (false, KeyCode::Down) => {
            let next = index_of(current).map_or(0, |i| (i + 1) % COUNTRIES.len());
            (true, Action::Choose(COUNTRIES[next].0))
        }
        _ => (false, Action::None),
    }
}

fn paint(container: &Container, view: &SelectView, value: &str, error: &str) {
    container.draw(|area, buf| render(area, buf, view, value, error));
}

fn render(area: Rect, buf: &mut Buffer, view: &SelectView, value: &str, error: &str) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let state = &view.state;
    let border = if !error.is_empty() {
        Color::Red
    } else if state.focused {
        ACCENT
    } else {
        Color::DarkGray
    };

    let content = if state.open {
        let (_, name) = COUNTRIES[state.highlighted];
        Line::from(vec![
            Span::styled("‹ ", Style::default().fg(ACCENT)),
            Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(" ›", Style::default().fg(ACCENT)),
            Span::styled(
                format!("  {}/{}", state.highlighted + 1, COUNTRIES.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else {
        match country_name(value) {
            Some(name) => Line::from(vec![Span::raw(name), Span::raw(" ▾")]),
            None => Line::from(Span::styled(
                view.props.placeholder.clone(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
        }
    };

    let mut title = vec![Span::raw(format!(" {} ", view.props.label))];
    if !error.is_empty() {
        title.push(Span::styled(
            "! ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let box_height = area.height.min(3);
    Paragraph::new(content)
        .block(block)
        .render(Rect::new(area.x, area.y, area.width, box_height), buf);

    if !error.is_empty() && area.height > box_height {
        Paragraph::new(Span::styled(format!(" ! {error}"), Style::default().fg(Color::Red)))
            .render(Rect::new(area.x, area.y + box_height, area.width, 1), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::island::MountAdapter;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> IslandEvent {
        IslandEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mounted(store: &Store) -> MountAdapter {
        let mut adapter = MountAdapter::default();
        adapter.container().resize(40, 4);
        adapter
            .mount(&factory(store.clone()), SelectProps::default().to_value())
            .unwrap();
        adapter
    }

    fn screen(adapter: &MountAdapter) -> String {
        (0..4).map(|row| adapter.container().row_text(row)).collect()
    }

    #[test]
    fn test_initial_render_shows_placeholder() {
        let store = Store::new();
        let adapter = mounted(&store);

        let text = screen(&adapter);
        assert!(text.contains("Country"));
        assert!(text.contains("Select your country"));
        assert_eq!(store.error(FieldId::Country), "");
    }

    #[test]
    fn test_open_and_choose_writes_store() {
        let store = Store::new();
        let adapter = mounted(&store);
        let container = adapter.container();

        assert!(container.dispatch(&key(KeyCode::Enter)));
        assert!(container.dispatch(&key(KeyCode::Down)));
        assert!(container.dispatch(&key(KeyCode::Enter)));

        assert_eq!(store.value(FieldId::Country), COUNTRIES[1].0);
        assert_eq!(store.error(FieldId::Country), "");
        assert!(screen(&adapter).contains(COUNTRIES[1].1));
    }

    #[test]
    fn test_closed_arrows_step_options() {
        let store = Store::new();
        let adapter = mounted(&store);

        adapter.container().dispatch(&key(KeyCode::Down));
        assert_eq!(store.value(FieldId::Country), COUNTRIES[0].0);

        adapter.container().dispatch(&key(KeyCode::Up));
        assert_eq!(store.value(FieldId::Country), COUNTRIES[COUNTRIES.len() - 1].0);
    }

    #[test]
    fn test_escape_closes_without_change() {
        let store = Store::new();
        let adapter = mounted(&store);
        let container = adapter.container();

        container.dispatch(&key(KeyCode::Enter));
        container.dispatch(&key(KeyCode::Down));
        assert!(container.dispatch(&key(KeyCode::Esc)));

        assert_eq!(store.value(FieldId::Country), "");
        assert!(!container.dispatch(&key(KeyCode::Esc)));
    }

    #[test]
    fn test_blur_validates_and_shows_error() {
        let store = Store::new();
        let adapter = mounted(&store);

        adapter.container().dispatch(&IslandEvent::Focus);
        adapter.container().dispatch(&IslandEvent::Blur);

        assert_eq!(store.error(FieldId::Country), "Please select a country");
        assert!(screen(&adapter).contains("Please select a country"));
    }

    #[test]
    fn test_repaints_on_external_store_change() {
        let store = Store::new();
        let adapter = mounted(&store);

        store.set_field(FieldId::Country, "jp");

        assert!(screen(&adapter).contains("Japan"));
    }

    #[test]
    fn test_reset_clears_selection() {
        let store = Store::new();
        let adapter = mounted(&store);
        store.set_field(FieldId::Country, "jp");

        store.reset();

        assert!(screen(&adapter).contains("Select your country"));
    }

    #[test]
    fn test_unmount_removes_subscription_and_listener() {
        let store = Store::new();
        let mut adapter = mounted(&store);
        assert_eq!(store.subscriber_count(), 1);
        assert_eq!(adapter.container().listener_count(), 1);

        let handle = adapter.current().unwrap();
        adapter.unmount(handle);

        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(adapter.container().listener_count(), 0);
        // Writes after teardown must not reach the destroyed widget
        store.set_field(FieldId::Country, "de");
        assert!(!screen(&adapter).contains("Germany"));
    }

    #[test]
    fn test_invalid_props_are_rejected() {
        let store = Store::new();
        let mut adapter = MountAdapter::default();

        let result = adapter.mount(&factory(store.clone()), json!({"label": 42}));

        assert!(matches!(result, Err(MountError::InvalidProps { .. })));
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_custom_label_prop() {
        let store = Store::new();
        let mut adapter = MountAdapter::default();
        adapter.container().resize(40, 4);
        let props = SelectProps {
            label: "Where are you?".to_string(),
            ..Default::default()
        };

        adapter.mount(&factory(store), props.to_value()).unwrap();

        assert!(screen(&adapter).contains("Where are you?"));
    }
}
