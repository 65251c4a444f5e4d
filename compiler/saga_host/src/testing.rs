//! Shared test fixtures: a small host model in the flavor of the game
//! engine this layer serves.

use std::cell::RefCell;
use std::rc::Rc;

use saga_eval::{Callable, DslInvoker, EvalError, HostObject, Value};
use saga_ir::SharedInterner;
use saga_types::{BasicKind, TypeIdx, TypeRegistry};

use crate::callback::{CallbackAdapter, CallbackShape};
use crate::descriptor::{
    enum_descriptor, BuilderDescriptor, BuilderParam, Construct, ExtensionProperty,
    MemberDescriptor, TypeDescriptor,
};
use crate::registry::HostRegistry;

/// Host entity owning components; pushed as the `entity` context member.
pub struct Entity {
    pub name: String,
}

/// Mutable host component, constructor-built. Stored as
/// `RefCell<Health>` inside its `HostObject`.
pub struct Health {
    pub owner: Option<HostObject>,
    pub max_points: i64,
    pub display_name: String,
    pub on_death: Option<Rc<CallbackAdapter>>,
}

/// Immutable host record.
#[derive(Debug, PartialEq)]
pub struct Reward {
    pub item_name: String,
    pub amount: i64,
}

/// Host enum.
#[derive(Clone, Debug, PartialEq)]
pub enum DamageKind {
    Physical,
    Fire,
    Poison,
}

/// Host object produced by the spawn-task builder.
pub struct SpawnTask {
    pub label: String,
    pub count: i64,
    pub has_owner: bool,
}

/// Fully registered registries plus the fixture type indices.
pub struct Fixture {
    pub interner: SharedInterner,
    pub types: TypeRegistry,
    pub host: HostRegistry,
    pub health_ty: TypeIdx,
    pub reward_ty: TypeIdx,
    pub damage_ty: TypeIdx,
    pub spawn_ty: TypeIdx,
}

fn health_cell<'o>(obj: &'o HostObject) -> Result<&'o RefCell<Health>, String> {
    obj.downcast_ref::<RefCell<Health>>()
        .ok_or_else(|| "receiver is not a health component".to_owned())
}

/// Build the standard fixture:
///
/// - `health_component`: constructor-built from the `entity` context
///   member, with `max_points`/`display_name` data members, an
///   `on_death` consumer callback slot, and a settable `rank`
///   extension property
/// - `reward`: record-built from `item_name` and `amount`
/// - `damage_kind`: host enum with three variants
/// - `spawn_task`: builder-built from the definition name, a `count`
///   member, and the `entity` context member
pub fn fixture() -> Fixture {
    let interner = SharedInterner::default();
    let mut types = TypeRegistry::new(&interner);
    let mut host = HostRegistry::new();

    let int = types.basic(BasicKind::Int);
    let none = types.basic(BasicKind::None);
    let string = types.basic(BasicKind::String);
    let on_death_ty = types.function_type(&[int], none);

    let health_descriptor = TypeDescriptor::new(
        interner.intern("health_component"),
        vec![
            MemberDescriptor::data(interner.intern("max_points"), int)
                .with_getter(Rc::new(|obj: &HostObject| {
                    let cell = obj.downcast_ref::<RefCell<Health>>()?;
                    Some(Rc::new(cell.borrow().max_points) as HostObject)
                }))
                .with_setter(Rc::new(|obj: &HostObject, v: HostObject| {
                    let cell = health_cell(obj)?;
                    cell.borrow_mut().max_points =
                        *v.downcast_ref::<i64>().ok_or("expected an int")?;
                    Ok(())
                })),
            MemberDescriptor::data(interner.intern("display_name"), string)
                .with_getter(Rc::new(|obj: &HostObject| {
                    let cell = obj.downcast_ref::<RefCell<Health>>()?;
                    Some(Rc::new(cell.borrow().display_name.clone()) as HostObject)
                }))
                .with_setter(Rc::new(|obj: &HostObject, v: HostObject| {
                    let cell = health_cell(obj)?;
                    cell.borrow_mut().display_name =
                        v.downcast_ref::<String>().ok_or("expected a string")?.clone();
                    Ok(())
                })),
            MemberDescriptor::callback(
                interner.intern("on_death"),
                on_death_ty,
                CallbackShape::Consumer { arity: 1 },
            )
            .with_setter(Rc::new(|obj: &HostObject, v: HostObject| {
                let cell = health_cell(obj)?;
                let adapter = v
                    .downcast::<CallbackAdapter>()
                    .map_err(|_| "expected a callback adapter")?;
                cell.borrow_mut().on_death = Some(adapter);
                Ok(())
            })),
        ],
        Construct::Constructor {
            context_params: vec![interner.intern("entity")],
            invoke: Rc::new(|args: &[Option<HostObject>]| -> Result<HostObject, String> {
                let owner = args.first().cloned().flatten();
                Ok(Rc::new(RefCell::new(Health {
                    owner,
                    max_points: 10,
                    display_name: "unnamed".to_owned(),
                    on_death: None,
                })))
            }),
        },
    );
    let health_ty = host
        .register_type::<RefCell<Health>>(&mut types, health_descriptor)
        .expect("health component registers");

    // Settable extension property: writes the display name without the
    // component exposing a member for it.
    host.register_property(
        &mut types,
        health_ty,
        ExtensionProperty {
            name: interner.intern("rank"),
            ty: int,
            get: None,
            set: Some(Rc::new(|obj: &HostObject, v: HostObject| {
                let cell = health_cell(obj)?;
                let rank = *v.downcast_ref::<i64>().ok_or("expected an int")?;
                cell.borrow_mut().display_name = format!("rank {rank}");
                Ok(())
            })),
        },
    )
    .expect("rank property registers");

    let reward_descriptor = TypeDescriptor::new(
        interner.intern("reward"),
        vec![
            MemberDescriptor::data(interner.intern("item_name"), string).with_getter(Rc::new(
                |obj: &HostObject| {
                    let reward = obj.downcast_ref::<Reward>()?;
                    Some(Rc::new(reward.item_name.clone()) as HostObject)
                },
            )),
            MemberDescriptor::data(interner.intern("amount"), int).with_getter(Rc::new(
                |obj: &HostObject| {
                    let reward = obj.downcast_ref::<Reward>()?;
                    Some(Rc::new(reward.amount) as HostObject)
                },
            )),
        ],
        Construct::Record {
            invoke: Rc::new(|args: &[Option<HostObject>]| -> Result<HostObject, String> {
                let item_name = args
                    .first()
                    .and_then(|a| a.as_ref())
                    .and_then(|a| a.downcast_ref::<String>())
                    .ok_or("missing item_name")?
                    .clone();
                let amount = *args
                    .get(1)
                    .and_then(|a| a.as_ref())
                    .and_then(|a| a.downcast_ref::<i64>())
                    .ok_or("missing amount")?;
                Ok(Rc::new(Reward { item_name, amount }))
            }),
        },
    );
    let reward_ty = host
        .register_type::<Reward>(&mut types, reward_descriptor)
        .expect("reward record registers");

    let damage_ty = host
        .register_enum::<DamageKind>(
            &mut types,
            interner.intern("damage_kind"),
            enum_descriptor(
                &interner,
                &[
                    ("physical", DamageKind::Physical),
                    ("fire", DamageKind::Fire),
                    ("poison", DamageKind::Poison),
                ],
            ),
        )
        .expect("damage kind registers");

    let spawn_descriptor = BuilderDescriptor {
        name: interner.intern("spawn_task"),
        params: vec![
            BuilderParam::DefinitionName,
            BuilderParam::Member {
                name: interner.intern("count"),
                ty: int,
            },
            BuilderParam::Context {
                key: interner.intern("entity"),
                ty: none,
            },
        ],
        invoke: Rc::new(|args: &[Option<HostObject>]| -> Result<HostObject, String> {
            let label = args
                .first()
                .and_then(|a| a.as_ref())
                .and_then(|a| a.downcast_ref::<String>())
                .cloned()
                .unwrap_or_default();
            let count = *args
                .get(1)
                .and_then(|a| a.as_ref())
                .and_then(|a| a.downcast_ref::<i64>())
                .ok_or("missing count")?;
            let has_owner = args.get(2).and_then(|a| a.as_ref()).is_some();
            Ok(Rc::new(SpawnTask {
                label,
                count,
                has_owner,
            }))
        }),
    };
    let spawn_ty = host
        .register_builder::<SpawnTask>(&mut types, spawn_descriptor)
        .expect("spawn task builder registers");

    Fixture {
        interner,
        types,
        host,
        health_ty,
        reward_ty,
        damage_ty,
        spawn_ty,
    }
}

/// Invoker stub that records every call and returns a fixed value.
pub struct RecordingInvoker {
    pub calls: RefCell<Vec<(Callable, Vec<Value>)>>,
    pub result: Value,
}

impl RecordingInvoker {
    pub fn returning(result: Value) -> Rc<Self> {
        Rc::new(RecordingInvoker {
            calls: RefCell::new(Vec::new()),
            result,
        })
    }
}

impl DslInvoker for RecordingInvoker {
    fn invoke(&self, callable: &Callable, args: Vec<Value>) -> Result<Value, EvalError> {
        self.calls.borrow_mut().push((*callable, args));
        Ok(self.result.clone())
    }
}
