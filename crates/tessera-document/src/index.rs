//! Typed references into a document's top-level arrays.
//!
//! A document refers to its own elements by position: a buffer view names its
//! buffer as `"buffer": 0`, a node its children as `"children": [1, 2]`. An
//! [`Index<T>`] keeps that integer together with a compile-time marker of the
//! array it points into. Nothing is checked while decoding; [`Index::resolve`]
//! is the one place a reference meets a concrete [`Document`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer};

use crate::error::IndexError;
use crate::schema::{
    Accessor, Animation, Buffer, BufferView, Camera, Document, Image, Material, Mesh, Node,
    Sampler, Scene, Skin, Texture,
};

/// An element type stored in one of the document's top-level arrays.
pub trait Indexed: Sized {
    /// JSON name of the array, used in error messages.
    const KIND: &'static str;

    /// The array this element type lives in.
    fn collection(document: &Document) -> &[Self];
}

/// Position of a `T` inside its document array.
pub struct Index<T> {
    value: usize,
    marker: PhantomData<fn() -> T>,
}

impl<T> Index<T> {
    /// Create a reference to position `value`.
    pub const fn new(value: usize) -> Self {
        Self { value, marker: PhantomData }
    }

    /// The raw position.
    pub fn value(self) -> usize {
        self.value
    }
}

impl<T: Indexed> Index<T> {
    /// Look the referenced element up in `document`.
    ///
    /// Fails with [`IndexError`] when the position is past the end of the
    /// target array.
    pub fn resolve(self, document: &Document) -> Result<&T, IndexError> {
        let items = T::collection(document);
        items.get(self.value).ok_or(IndexError {
            kind: T::KIND,
            index: self.value,
            len: items.len(),
        })
    }
}

impl<T> Clone for Index<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Index<T> {}

impl<T> PartialEq for Index<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Index<T> {}

impl<T> Hash for Index<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> PartialOrd for Index<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Index<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Index").field(&self.value).finish()
    }
}

impl<T: Indexed> fmt::Display for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", T::KIND, self.value)
    }
}

impl<'de, T> Deserialize<'de> for Index<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        usize::deserialize(deserializer).map(Self::new)
    }
}

macro_rules! impl_indexed {
    ($($ty:ty => $field:ident, $kind:literal;)*) => {
        $(
            impl Indexed for $ty {
                const KIND: &'static str = $kind;

                fn collection(document: &Document) -> &[Self] {
                    &document.$field
                }
            }
        )*
    };
}

impl_indexed! {
    Accessor => accessors, "accessors";
    Animation => animations, "animations";
    Buffer => buffers, "buffers";
    BufferView => buffer_views, "bufferViews";
    Camera => cameras, "cameras";
    Image => images, "images";
    Material => materials, "materials";
    Mesh => meshes, "meshes";
    Node => nodes, "nodes";
    Sampler => samplers, "samplers";
    Scene => scenes, "scenes";
    Skin => skins, "skins";
    Texture => textures, "textures";
}
