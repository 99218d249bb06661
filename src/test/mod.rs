//! Shared fixtures for unit tests

use crate::{
    inspection::{DecodedMethod, DecodedModule, DecodedType},
    metadata::{
        builder::ModelBuilder,
        identity::{AssemblyKey, MemberKey, NamespaceKey, NodeKey, TypeKey},
        model::{QueryRoot, SYSTEM_ASSEMBLY, SYSTEM_NAMESPACE},
    },
};

// Helper function to create a key in the System namespace of the core library
pub fn system_type(name: &str) -> TypeKey {
    AssemblyKey::new(SYSTEM_ASSEMBLY)
        .namespace(SYSTEM_NAMESPACE)
        .type_key(name)
}

// Helper function to create the namespace all fixtures live in
pub fn app_namespace() -> NamespaceKey {
    AssemblyKey::new("App").namespace("N")
}

// Helper function to create the key of method `Run` on the type N.<name>
pub fn method_key(name: &str) -> MemberKey {
    app_namespace().type_key(name).method("Run", vec![])
}

// Helper function to build a model where each named method lives on its own type
pub fn method_graph(calls: &[(&str, &[&str])]) -> QueryRoot {
    let namespace = app_namespace();
    let mut root = QueryRoot::new();
    let mut builder = ModelBuilder::new(&mut root);
    builder.start_namespace(&namespace).unwrap();
    for (caller, callees) in calls {
        builder
            .start_type(method_key(caller).declaring_type(), false)
            .unwrap();
        builder.start_method(&method_key(caller), false).unwrap();
        for callee in *callees {
            builder
                .use_node(&NodeKey::Method(method_key(callee)))
                .unwrap();
        }
        builder.end_method().unwrap();
        builder.end_type().unwrap();
    }
    builder.end_namespace().unwrap();
    builder.finish().unwrap();
    root
}

// Helper function to create the module N.A.Foo() -> N.B.Bar(), with Bar referencing nothing
pub fn scenario_module() -> DecodedModule {
    let namespace = app_namespace();
    let a = namespace.type_key("A");
    let b = namespace.type_key("B");
    let bar = b.method("Bar", vec![]);

    let foo = DecodedMethod::new(a.method("Foo", vec![]))
        .with_body([NodeKey::Method(bar.clone())]);
    let bar = DecodedMethod::new(bar).with_body([]);

    DecodedModule::new(AssemblyKey::new("App"))
        .with_type(DecodedType::new(a).with_method(foo))
        .with_type(DecodedType::new(b).with_method(bar))
}
