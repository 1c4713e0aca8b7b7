//! Scene-scoped draw ordering.
//!
//! A [`DrawRegistry`] is created when a scene is entered and dropped when it
//! exits; there is no process-wide instance.  Items are drawn layer by layer
//! (background first), in registration order within a layer.

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Layer {
    #[default]
    Background,
    Middle,
    Foreground,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Background, Layer::Middle, Layer::Foreground];

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

/// Opaque handle returned by [`DrawRegistry::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawId(u64);

pub struct DrawRegistry<T> {
    next_id: u64,
    layers: [Vec<(DrawId, T)>; 3],
}

impl<T> Default for DrawRegistry<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            layers: [Vec::new(), Vec::new(), Vec::new()],
        }
    }
}

impl<T> DrawRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, item: T, layer: Layer) -> DrawId {
        let id = DrawId(self.next_id);
        self.next_id += 1;
        self.layers[layer.slot()].push((id, item));
        id
    }

    /// Remove an item, returning it if it was still registered.
    pub fn unregister(&mut self, id: DrawId) -> Option<T> {
        for layer in &mut self.layers {
            if let Some(pos) = layer.iter().position(|(i, _)| *i == id) {
                return Some(layer.remove(pos).1);
            }
        }
        None
    }

    pub fn get_mut(&mut self, id: DrawId) -> Option<&mut T> {
        self.layers
            .iter_mut()
            .flat_map(|l| l.iter_mut())
            .find(|(i, _)| *i == id)
            .map(|(_, item)| item)
    }

    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Vec::is_empty)
    }

    /// Items of one layer in registration order.
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &T> {
        self.layers[layer.slot()].iter().map(|(_, item)| item)
    }

    /// Every item in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (Layer, &T)> {
        Layer::ALL
            .into_iter()
            .flat_map(move |layer| self.layer(layer).map(move |item| (layer, item)))
    }
}
