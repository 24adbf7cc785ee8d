use crate::components::{Component, ComponentStore, ComponentType};
use crate::entities::Entity;

/// A group of [component](Component) values attached to an [Entity] in one go.
///
/// Implemented for tuples of components, e.g. `(Position { x: 1, y: 1 }, Velocity { dx: 2, dy: 2 })`,
/// and for structs deriving `Bundle`, where each field becomes one component of its own type.
pub trait ComponentBundle: Sized {
	/// The [component types](ComponentType) of the bundle, in declaration order.
	fn component_types() -> Vec<ComponentType>;

	/// Moves every component into `store` under `entity`.
	fn insert_into(self, store: &mut ComponentStore, entity: Entity);
}

impl ComponentBundle for () {
	fn component_types() -> Vec<ComponentType> {
		Vec::new()
	}

	fn insert_into(self, _: &mut ComponentStore, _: Entity) {}
}

macro_rules! impl_component_bundle {
    ($($t: ident $i: tt),*) => {
        impl <$($t: Component),*> ComponentBundle for ($($t),*,) {
            fn component_types() -> Vec<ComponentType> {
                vec![$(ComponentType::of_component::<$t>()),*]
            }

            fn insert_into(self, store: &mut ComponentStore, entity: Entity) {
                $(store.insert(entity, self.$i);)*
            }
        }
    };
}

impl_component_bundle!(T0 0);
impl_component_bundle!(T0 0, T1 1);
impl_component_bundle!(T0 0, T1 1, T2 2);
impl_component_bundle!(T0 0, T1 1, T2 2, T3 3);
impl_component_bundle!(T0 0, T1 1, T2 2, T3 3, T4 4);
impl_component_bundle!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
impl_component_bundle!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6);
impl_component_bundle!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7);
impl_component_bundle!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8);
impl_component_bundle!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9);
impl_component_bundle!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10);
impl_component_bundle!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11);
