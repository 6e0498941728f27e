use std::collections::HashSet;

use log::debug;

use crate::document::{DocumentTree, NodeId};

/// Behaviour re-attached to nodes after a load
pub trait HydrationHooks {
    fn image_on_click(&mut self, image: NodeId);
}

/// Walk the subtree at `root` and attach hooks to every image.
/// Returns the number of images seen.
pub fn hydrate(tree: &DocumentTree, root: NodeId, hooks: &mut impl HydrationHooks) -> usize {
    let images: Vec<NodeId> = tree
        .descendants(root)
        .into_iter()
        .filter(|id| tree.tag(*id) == Some("img"))
        .collect();

    for image in &images {
        hooks.image_on_click(*image);
    }
    debug!("Hydrated {} images", images.len());
    images.len()
}

/// Images that select themselves for manipulation when clicked
#[derive(Debug, Clone, Default)]
pub struct ClickRegistry {
    images: HashSet<NodeId>,
}

impl ClickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, image: NodeId) -> bool {
        self.images.insert(image)
    }

    pub fn is_registered(&self, image: NodeId) -> bool {
        self.images.contains(&image)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    /// Forget images no longer in the document
    pub fn retain_mounted(&mut self, tree: &DocumentTree) {
        self.images.retain(|image| tree.is_mounted(*image));
    }
}

impl HydrationHooks for ClickRegistry {
    fn image_on_click(&mut self, image: NodeId) {
        self.register(image);
    }
}
