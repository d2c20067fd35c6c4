//! Schema mapping between the public and the backing shape of a kind.

use crate::error::ConversionError;
use crate::resource::{BackingObject, Resource};

/// Bidirectional mapping used by [`ResourceProxy`](crate::ResourceProxy).
///
/// `to_backing` writes into an existing backing object rather than building one, so
/// backing-only fields of `target` survive. For every public `x`,
/// `to_public(&b)` after `to_backing(&x, &mut b)` must reproduce `x`.
pub trait Converter: Send + Sync + 'static {
    type Public: Resource;
    type Backing: BackingObject;

    fn to_public(&self, backing: &Self::Backing) -> Result<Self::Public, ConversionError>;

    fn to_backing(
        &self,
        public: &Self::Public,
        target: &mut Self::Backing,
    ) -> Result<(), ConversionError>;
}
