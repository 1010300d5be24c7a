#![allow(dead_code)]

use strand::{BoxError, Receiver, ScalarKind, Shape, ShapeRef, Value, testing::CallRecorder};

// ============================================================================
// Capability
// ============================================================================

/// The base capability: `web.Controller` with an action name and two methods.
pub fn controller() -> ShapeRef {
    Shape::structure("web.Controller")
        .field("Action", &Shape::scalar(ScalarKind::Str))
        .pointer_method("SetAction", set_action)
        .pointer_method("Render", render)
        .build()
        .unwrap()
}

/// What application types embed: `*web.Controller`.
pub fn capability() -> ShapeRef {
    Shape::pointer_to(&controller())
}

fn set_action(mut recv: Receiver<'_>, args: &[Value]) -> Result<Vec<Value>, BoxError> {
    let action = args.first().and_then(Value::as_str).unwrap_or_default().to_string();
    recv.as_struct_mut()?.set("Action", action)?;
    Ok(Vec::new())
}

fn render(recv: Receiver<'_>, _args: &[Value]) -> Result<Vec<Value>, BoxError> {
    let action = recv.as_struct()?.get("Action")?.clone();
    Ok(vec![action])
}

// ============================================================================
// Application Types
// ============================================================================

/// `app.Hotels`: embeds the capability and declares `Index` and `Show`.
pub fn hotels(recorder: &CallRecorder) -> ShapeRef {
    Shape::structure("app.Hotels")
        .embed(&capability())
        .field("City", &Shape::scalar(ScalarKind::Str))
        .method("Index", recorder.hook_returning("hotels.index", vec![Value::from("listing")]))
        .pointer_method("Show", recorder.hook("hotels.show"))
        .build()
        .unwrap()
}

/// `app.Auth`: a reusable component embedding the capability, with its own
/// `Before` and `After` hooks.
pub fn auth(recorder: &CallRecorder) -> ShapeRef {
    Shape::structure("app.Auth")
        .embed(&capability())
        .pointer_method("Before", recorder.hook("auth.before"))
        .method("After", recorder.hook("auth.after"))
        .build()
        .unwrap()
}

/// `app.Admin`: embeds `Auth` inline and adds hooks of its own.
pub fn admin(recorder: &CallRecorder) -> ShapeRef {
    Shape::structure("app.Admin")
        .embed(&auth(recorder))
        .pointer_method("Before", recorder.hook("admin.before"))
        .pointer_method("After", recorder.hook("admin.after"))
        .method("Panic", recorder.hook("admin.panic"))
        .method("Finally", recorder.hook("admin.finally"))
        .method("Index", recorder.hook("admin.index"))
        .pointer_method("Delete", recorder.failing_hook("admin.delete"))
        .build()
        .unwrap()
}

/// `app.Mid`: embeds the capability.
pub fn mid() -> ShapeRef {
    Shape::structure("app.Mid").embed(&capability()).build().unwrap()
}

/// `app.Outer`: reaches the capability through a pointer-to-struct embedding.
pub fn outer() -> ShapeRef {
    Shape::structure("app.Outer")
        .embed(&Shape::pointer_to(&mid()))
        .build()
        .unwrap()
}

/// An `app.Outer` instance whose pointers are all allocated.
pub fn outer_instance() -> Value {
    let mut mid = Value::zero(&mid());
    mid.as_struct_mut()
        .unwrap()
        .set("Controller", Value::new_pointer(&controller()))
        .unwrap();

    let mut outer = Value::zero(&outer());
    outer.as_struct_mut().unwrap().set("Mid", mid.boxed()).unwrap();
    outer
}
