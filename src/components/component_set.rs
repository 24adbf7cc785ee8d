use crate::components::{ComponentType, ComponentTypeInfo};
use std::fmt;

/// Implemented for tuples of [Component](crate::components::Component) types (and references to them).
/// It provides a unified way to list the [component types](ComponentType) a system requires,
/// e.g. `(Position, Velocity)` or `(&mut Position, &Velocity)`.
pub trait ComponentSet {
	/// The [component types](ComponentType) named by the set, in declaration order.
	fn component_types() -> Vec<ComponentType>;
}

impl ComponentSet for () {
	fn component_types() -> Vec<ComponentType> {
		Vec::new()
	}
}

macro_rules! impl_component_set {
    ($($t: ident $i: tt),*) => {
        impl <$($t: ComponentTypeInfo),*> ComponentSet for ($($t),*,) {
            fn component_types() -> Vec<ComponentType> {
                vec![$(ComponentType::of::<$t>()),*]
            }
        }
    };
}

impl_component_set!(T0 0);
impl_component_set!(T0 0, T1 1);
impl_component_set!(T0 0, T1 1, T2 2);
impl_component_set!(T0 0, T1 1, T2 2, T3 3);
impl_component_set!(T0 0, T1 1, T2 2, T3 3, T4 4);
impl_component_set!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
impl_component_set!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6);
impl_component_set!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7);
impl_component_set!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8);
impl_component_set!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9);
impl_component_set!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10);
impl_component_set!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11);

/// The set of [component types](ComponentType) a [System](crate::systems::System) requires.
///
/// Order-insensitive: the types are kept sorted by [ComponentId](crate::components::ComponentId)
/// and a type named twice is only recorded once.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature {
	types: Vec<ComponentType>,
}

impl Signature {
	/// The [Signature] of the [ComponentSet] `C`.
	pub fn of<C: ComponentSet>() -> Self {
		Self::from(C::component_types().as_slice())
	}

	/// A [Signature] requiring nothing, matched by every entity.
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn types(&self) -> &[ComponentType] {
		&self.types
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	pub fn contains(&self, ty: &ComponentType) -> bool {
		self.types.binary_search_by_key(&ty.id(), |t| t.id()).is_ok()
	}
}

impl From<&[ComponentType]> for Signature {
	fn from(types: &[ComponentType]) -> Self {
		let mut types = types.to_vec();
		types.sort_by_key(|t| t.id());
		types.dedup();
		Self { types }
	}
}

impl fmt::Debug for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.types.iter()).finish()
	}
}
