//! Test fixtures

use codegraph_dispose::config::DisposeConfig;
use codegraph_dispose::shared::models::{
    Compilation, CompilationId, FieldRef, FieldSymbol, MethodRef, MethodSymbol, RefKind, TypeRef,
    TypeSymbol,
};
use codegraph_dispose::DisposeAnalysisSession;
use std::sync::Arc;

/// Types of the fixture compilation
#[derive(Clone)]
pub struct Fixture {
    pub compilation: Arc<Compilation>,
    pub disposable: TypeRef,
    pub boolean: TypeRef,
    pub int: TypeRef,
    pub string: TypeRef,
    pub task: TypeRef,
    pub stream: TypeRef,
    pub file_stream: TypeRef,
    pub text_reader: TypeRef,
    pub stream_reader: TypeRef,
    pub resource: TypeRef,
    pub value_resource: TypeRef,
    pub plain: TypeRef,
    pub list: TypeRef,
    pub dictionary: TypeRef,
    pub owner: TypeRef,
    pub helpers: TypeRef,
    pub owner_stream: FieldRef,
    pub owner_reader: FieldRef,
    pub owner_count: FieldRef,
    pub owner_shared: FieldRef,
}

pub fn fixture() -> Fixture {
    fixture_with_id(CompilationId(1))
}

pub fn fixture_with_id(id: CompilationId) -> Fixture {
    let disposable = TypeSymbol::interface("System.IDisposable").into_ref();
    let boolean = TypeSymbol::value_type("System.Boolean").into_ref();
    let int = TypeSymbol::value_type("System.Int32").into_ref();
    let string = TypeSymbol::class("System.String").into_ref();
    let task = TypeSymbol::class("System.Threading.Tasks.Task")
        .implementing(disposable.clone())
        .into_ref();
    let icollection = TypeSymbol::interface("System.Collections.Generic.ICollection`1").into_ref();
    let idictionary = TypeSymbol::interface("System.Collections.Generic.IDictionary`2")
        .implementing(icollection.clone())
        .into_ref();
    let stream = TypeSymbol::class("System.IO.Stream")
        .implementing(disposable.clone())
        .into_ref();
    let file_stream = TypeSymbol::class("System.IO.FileStream")
        .with_base(stream.clone())
        .into_ref();
    let text_reader = TypeSymbol::class("System.IO.TextReader")
        .implementing(disposable.clone())
        .into_ref();
    let stream_reader = TypeSymbol::class("System.IO.StreamReader")
        .with_base(text_reader.clone())
        .into_ref();
    let resource = TypeSymbol::class("Test.Resource")
        .implementing(disposable.clone())
        .into_ref();
    let value_resource = TypeSymbol::value_type("Test.ValueResource")
        .implementing(disposable.clone())
        .into_ref();
    let plain = TypeSymbol::class("Test.Plain").into_ref();
    let list = TypeSymbol::class("Test.List")
        .implementing(icollection.clone())
        .into_ref();
    let dictionary = TypeSymbol::class("Test.Dictionary")
        .implementing(idictionary.clone())
        .into_ref();
    let owner = TypeSymbol::class("Test.Owner")
        .implementing(disposable.clone())
        .into_ref();
    let helpers = TypeSymbol::class("Test.Helpers").into_ref();

    let owner_stream = FieldSymbol::new("_stream", "Test.Owner", stream.clone()).into_ref();
    let owner_reader = FieldSymbol::new("_reader", "Test.Owner", text_reader.clone()).into_ref();
    let owner_count = FieldSymbol::new("_count", "Test.Owner", int.clone()).into_ref();
    let mut shared = FieldSymbol::new("_shared", "Test.Owner", stream.clone());
    shared.is_static = true;
    let owner_shared = shared.into_ref();

    let mut compilation = Compilation::new(id);
    for ty in [
        &disposable,
        &boolean,
        &int,
        &string,
        &task,
        &icollection,
        &idictionary,
        &stream,
        &file_stream,
        &text_reader,
        &stream_reader,
        &resource,
        &value_resource,
        &plain,
        &list,
        &dictionary,
        &owner,
        &helpers,
    ] {
        compilation.add_type(ty.clone());
    }
    for field in [&owner_stream, &owner_reader, &owner_count, &owner_shared] {
        compilation.add_field(field.clone());
    }

    Fixture {
        compilation: Arc::new(compilation),
        disposable,
        boolean,
        int,
        string,
        task,
        stream,
        file_stream,
        text_reader,
        stream_reader,
        resource,
        value_resource,
        plain,
        list,
        dictionary,
        owner,
        helpers,
        owner_stream,
        owner_reader,
        owner_count,
        owner_shared,
    }
}

impl Fixture {
    pub fn session(&self, config: DisposeConfig) -> DisposeAnalysisSession {
        DisposeAnalysisSession::new(Arc::clone(&self.compilation), config)
            .expect("fixture compilation has the well-known types")
    }

    pub fn default_session(&self) -> DisposeAnalysisSession {
        self.session(DisposeConfig::default())
    }

    /// `void Test.Helpers.Run()`
    pub fn run_method(&self) -> MethodRef {
        MethodSymbol::ordinary("Run", self.helpers.clone())
            .static_method()
            .into_ref()
    }

    pub fn ctor(&self, ty: &TypeRef) -> MethodRef {
        MethodSymbol::constructor(ty.clone()).into_ref()
    }

    pub fn ctor_with(&self, ty: &TypeRef, params: &[(&str, &TypeRef)]) -> MethodRef {
        params
            .iter()
            .fold(MethodSymbol::constructor(ty.clone()), |m, (name, pty)| {
                m.with_parameter(*name, (*pty).clone())
            })
            .into_ref()
    }

    pub fn dispose_method(&self, ty: &TypeRef) -> MethodRef {
        MethodSymbol::ordinary("Dispose", ty.clone()).into_ref()
    }

    pub fn close_method(&self, ty: &TypeRef) -> MethodRef {
        MethodSymbol::ordinary("Close", ty.clone()).into_ref()
    }

    /// `static Resource Helpers.<name>()`
    pub fn static_resource_method(&self, name: &str) -> MethodRef {
        MethodSymbol::ordinary(name, self.helpers.clone())
            .static_method()
            .returning(self.resource.clone())
            .into_ref()
    }

    /// `static void Helpers.<name>(Resource r)`
    pub fn consumer_method(&self, name: &str) -> MethodRef {
        MethodSymbol::ordinary(name, self.helpers.clone())
            .static_method()
            .with_parameter("r", self.resource.clone())
            .into_ref()
    }

    /// `bool Dictionary.TryGetValue(string key, out Resource value)`
    pub fn try_get_value(&self) -> MethodRef {
        MethodSymbol::ordinary("TryGetValue", self.dictionary.clone())
            .with_parameter("key", self.string.clone())
            .with_ref_parameter("value", self.resource.clone(), RefKind::Out)
            .returning(self.boolean.clone())
            .into_ref()
    }

    /// `void Dictionary.Fill(string key, out Resource value)`
    pub fn fill_value(&self) -> MethodRef {
        MethodSymbol::ordinary("Fill", self.dictionary.clone())
            .with_parameter("key", self.string.clone())
            .with_ref_parameter("value", self.resource.clone(), RefKind::Out)
            .into_ref()
    }

    /// `void <ty>.Add(Resource item)`
    pub fn add_method(&self, ty: &TypeRef) -> MethodRef {
        MethodSymbol::ordinary("Add", ty.clone())
            .with_parameter("item", self.resource.clone())
            .into_ref()
    }
}
