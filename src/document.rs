//! Mount points the widget attaches its surface to.
//!
//! A [`Document`] is a flat registry of named containers. Containers are
//! shared (`Rc<RefCell<_>>`) between the document, the host that sizes them,
//! and any widget mounted inside.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use crate::options::Background;
use crate::types::Point;

/// Identifies a child node appended to a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

#[derive(Debug)]
pub struct Container {
    id: String,
    client_width: usize,
    client_height: usize,
    /// Top-left of the content box in client coordinates.
    origin: Point,
    backdrop: Option<Background>,
    children: Vec<NodeId>,
}

impl Container {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn client_size(&self) -> (usize, usize) {
        (self.client_width, self.client_height)
    }

    pub fn set_client_size(&mut self, width: usize, height: usize) {
        self.client_width = width;
        self.client_height = height;
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// The visual shown behind the children (background image or color).
    pub fn backdrop(&self) -> Option<&Background> {
        self.backdrop.as_ref()
    }

    pub fn set_backdrop(&mut self, backdrop: Option<Background>) {
        self.backdrop = backdrop;
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.children.contains(&node)
    }

    pub(crate) fn append_child(&mut self, node: NodeId) {
        self.children.push(node);
    }

    /// Returns false if `node` was not a child.
    pub(crate) fn remove_child(&mut self, node: NodeId) -> bool {
        let before = self.children.len();
        self.children.retain(|&c| c != node);
        self.children.len() != before
    }
}

#[derive(Debug, Clone)]
pub struct ContainerHandle(Rc<RefCell<Container>>);

impl ContainerHandle {
    pub fn borrow(&self) -> Ref<'_, Container> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Container> {
        self.0.borrow_mut()
    }
}

#[derive(Default)]
pub struct Document {
    containers: HashMap<String, ContainerHandle>,
    next_node: Cell<u64>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container. An existing container with the same id is replaced.
    pub fn create_container(&mut self, id: &str, width: usize, height: usize) -> ContainerHandle {
        let handle = ContainerHandle(Rc::new(RefCell::new(Container {
            id: id.to_string(),
            client_width: width,
            client_height: height,
            origin: Point::default(),
            backdrop: None,
            children: Vec::new(),
        })));
        self.containers.insert(id.to_string(), handle.clone());
        handle
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<ContainerHandle> {
        self.containers.get(id).cloned()
    }

    pub(crate) fn allocate_node(&self) -> NodeId {
        let id = self.next_node.get();
        self.next_node.set(id + 1);
        NodeId(id)
    }
}
