//! Mount adapter for island widgets
//!
//! An island is any widget that can be created against a [`Container`] with a
//! snapshot of props and later destroyed. The adapter keeps at most one live
//! instance per site and always destroys the old instance before creating a
//! new one.

use super::container::Container;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Errors raised while mounting an island
#[derive(Debug, Error)]
pub enum MountError {
    #[error("invalid props for {island}: {source}")]
    InvalidProps {
        island: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A mounted island instance
pub trait Island {
    /// Release every listener and subscription the instance registered
    fn destroy(&mut self);
}

type CreateFn = dyn Fn(&Container, &Value) -> Result<Box<dyn Island>, MountError>;

/// Named constructor for an island type.
///
/// Collaborators the island needs (such as the store) are captured when the
/// factory is built; only the props snapshot travels through the adapter.
#[derive(Clone)]
pub struct IslandFactory {
    name: &'static str,
    create: Rc<CreateFn>,
}

impl fmt::Debug for IslandFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IslandFactory")
            .field("name", &self.name)
            .finish()
    }
}

impl IslandFactory {
    pub fn new<F>(name: &'static str, create: F) -> Self
    where
        F: Fn(&Container, &Value) -> Result<Box<dyn Island>, MountError> + 'static,
    {
        Self {
            name,
            create: Rc::new(create),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn create(
        &self,
        container: &Container,
        props: &Value,
    ) -> Result<Box<dyn Island>, MountError> {
        (self.create)(container, props)
    }
}

/// Opaque handle to a mounted instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountHandle(u64);

struct Mounted {
    handle: MountHandle,
    factory: &'static str,
    props: Value,
    instance: Box<dyn Island>,
}

/// One adapter site: a container plus the instance mounted in it
pub struct MountAdapter {
    container: Container,
    live: Option<Mounted>,
    next_handle: u64,
}

impl fmt::Debug for MountAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountAdapter")
            .field("container", &self.container)
            .field("mounted", &self.live.as_ref().map(|m| (m.factory, m.handle)))
            .finish()
    }
}

impl Default for MountAdapter {
    fn default() -> Self {
        Self::new(Container::new())
    }
}

impl MountAdapter {
    pub fn new(container: Container) -> Self {
        Self {
            container,
            live: None,
            next_handle: 0,
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn is_mounted(&self) -> bool {
        self.live.is_some()
    }

    pub fn current(&self) -> Option<MountHandle> {
        self.live.as_ref().map(|m| m.handle)
    }

    /// Create a new instance, destroying the live one first
    pub fn mount(
        &mut self,
        factory: &IslandFactory,
        props: Value,
    ) -> Result<MountHandle, MountError> {
        if let Some(handle) = self.current() {
            self.unmount(handle);
        }

        let instance = factory.create(&self.container, &props)?;
        let handle = MountHandle(self.next_handle);
        self.next_handle += 1;
        tracing::debug!(island = factory.name(), ?handle, "mounted island");
        self.live = Some(Mounted {
            handle,
            factory: factory.name(),
            props,
            instance,
        });
        Ok(handle)
    }

    /// Destroy the instance `handle` refers to. Returns false for stale handles.
    pub fn unmount(&mut self, handle: MountHandle) -> bool {
        match self.live.take() {
            Some(mut mounted) if mounted.handle == handle => {
                mounted.instance.destroy();
                let leaked = self.container.listener_count();
                if leaked > 0 {
                    tracing::warn!(
                        island = mounted.factory,
                        leaked,
                        "island left listeners behind"
                    );
                }
                self.container.clear();
                tracing::debug!(island = mounted.factory, ?handle, "unmounted island");
                true
            }
            other => {
                self.live = other;
                tracing::warn!(?handle, "unmount with stale handle ignored");
                false
            }
        }
    }

    /// Mount `factory` with `props` unless that exact pairing is already live.
    ///
    /// Returns the new handle when a (re)mount happened.
    pub fn sync(
        &mut self,
        factory: &IslandFactory,
        props: &Value,
    ) -> Result<Option<MountHandle>, MountError> {
        let unchanged = self
            .live
            .as_ref()
            .is_some_and(|m| m.factory == factory.name() && m.props == *props);
        if unchanged {
            return Ok(None);
        }
        self.mount(factory, props.clone()).map(Some)
    }
}

impl Drop for MountAdapter {
    fn drop(&mut self) {
        if let Some(handle) = self.current() {
            self.unmount(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    /// Records lifecycle calls into a shared log
    struct Probe {
        label: String,
        log: Rc<RefCell<Vec<String>>>,
        container: Container,
        listener: Option<super::super::container::ListenerId>,
    }

    impl Island for Probe {
        fn destroy(&mut self) {
            if let Some(id) = self.listener.take() {
                self.container.remove_listener(id);
            }
            self.log.borrow_mut().push(format!("destroy {}", self.label));
        }
    }

    fn probe_factory(name: &'static str, log: Rc<RefCell<Vec<String>>>) -> IslandFactory {
        IslandFactory::new(name, move |container, props| {
            let label = props
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or(name)
                .to_string();
            log.borrow_mut().push(format!("create {label}"));
            let listener = container.add_listener(|_| true);
            let probe = Probe {
                label,
                log: Rc::clone(&log),
                container: container.clone(),
                listener: Some(listener),
            };
            Ok(Box::new(probe) as Box<dyn Island>)
        })
    }

    #[test]
    fn test_mount_and_unmount_release_listeners() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let factory = probe_factory("probe", Rc::clone(&log));
        let mut adapter = MountAdapter::default();

        let handle = adapter.mount(&factory, json!({"label": "a"})).unwrap();
        assert!(adapter.is_mounted());
        assert_eq!(adapter.container().listener_count(), 1);

        assert!(adapter.unmount(handle));
        assert!(!adapter.is_mounted());
        assert_eq!(adapter.container().listener_count(), 0);
        assert_eq!(*log.borrow(), vec!["create a", "destroy a"]);
    }

    #[test]
    fn test_remount_destroys_before_create() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let factory = probe_factory("probe", Rc::clone(&log));
        let mut adapter = MountAdapter::default();

        adapter.mount(&factory, json!({"label": "a"})).unwrap();
        adapter.mount(&factory, json!({"label": "b"})).unwrap();

        assert_eq!(*log.borrow(), vec!["create a", "destroy a", "create b"]);
        assert_eq!(adapter.container().listener_count(), 1);
    }

    #[test]
    fn test_sync_skips_identical_props() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let factory = probe_factory("probe", Rc::clone(&log));
        let mut adapter = MountAdapter::default();
        let props = json!({"label": "a"});

        assert!(adapter.sync(&factory, &props).unwrap().is_some());
        assert!(adapter.sync(&factory, &props).unwrap().is_none());

        assert_eq!(*log.borrow(), vec!["create a"]);
    }

    #[test]
    fn test_sync_remounts_on_prop_change() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let factory = probe_factory("probe", Rc::clone(&log));
        let mut adapter = MountAdapter::default();

        adapter.sync(&factory, &json!({"label": "a"})).unwrap();
        adapter.sync(&factory, &json!({"label": "b"})).unwrap();

        assert_eq!(*log.borrow(), vec!["create a", "destroy a", "create b"]);
    }

    #[test]
    fn test_sync_remounts_on_factory_change() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = probe_factory("first", Rc::clone(&log));
        let second = probe_factory("second", Rc::clone(&log));
        let mut adapter = MountAdapter::default();

        adapter.sync(&first, &json!({})).unwrap();
        adapter.sync(&second, &json!({})).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["create first", "destroy first", "create second"]
        );
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let factory = probe_factory("probe", Rc::clone(&log));
        let mut adapter = MountAdapter::default();

        let old = adapter.mount(&factory, json!({"label": "a"})).unwrap();
        let new = adapter.mount(&factory, json!({"label": "b"})).unwrap();

        assert!(!adapter.unmount(old));
        assert_eq!(adapter.current(), Some(new));
    }

    #[test]
    fn test_drop_destroys_instance() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let factory = probe_factory("probe", Rc::clone(&log));
        let container = Container::new();
        {
            let mut adapter = MountAdapter::new(container.clone());
            adapter.mount(&factory, json!({"label": "a"})).unwrap();
        }
        assert_eq!(*log.borrow(), vec!["create a", "destroy a"]);
        assert_eq!(container.listener_count(), 0);
    }

    #[test]
    fn test_failed_create_leaves_site_empty() {
        let failing = IslandFactory::new("failing", |_, props| {
            serde_json::from_value::<u32>(props.clone())
                .map(|_| Box::new(NoopIsland) as Box<dyn Island>)
                .map_err(|source| MountError::InvalidProps {
                    island: "failing",
                    source,
                })
        });
        let mut adapter = MountAdapter::default();

        let err = adapter.mount(&failing, json!("nope")).unwrap_err();

        assert!(err.to_string().contains("invalid props for failing"));
        assert!(!adapter.is_mounted());
    }

    struct NoopIsland;

    impl Island for NoopIsland {
        fn destroy(&mut self) {}
    }
}
