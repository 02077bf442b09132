//! Entity handle

slotmap::new_key_type! {
    /// Opaque, generational handle to an entity in a host scene.
    ///
    /// Equality is handle identity. A handle outlives the entity it names:
    /// once the entity is removed the handle simply stops resolving.
    pub struct Entity;
}
