use super::*;
use proxygen_fmt::{Canonical, FormatError, FormatResult};
use proxygen_sema::{ImportBinding, MethodSignature, Qualifier, TypeExpression};

const A_PATH: &str = "example.com/p/a";
const A_ALIAS: &str = "importaGreeter0";

fn prim(name: &str) -> TypeExpression {
    TypeExpression::primitive(name)
}

fn local(name: &str) -> TypeExpression {
    TypeExpression::Named {
        qualifier: Qualifier {
            module_path: A_PATH.to_string(),
            alias: A_ALIAS.to_string(),
        },
        name: name.to_string(),
        type_args: Vec::new(),
    }
}

fn method(name: &str, params: Vec<TypeExpression>, results: Vec<TypeExpression>) -> MethodSignature {
    MethodSignature {
        name: name.to_string(),
        params,
        results,
    }
}

fn descriptor(methods: Vec<MethodSignature>) -> InterfaceDescriptor {
    InterfaceDescriptor {
        module_path: A_PATH.to_string(),
        module_name: "a".to_string(),
        name: "Greeter".to_string(),
        imports: vec![ImportBinding {
            module_path: A_PATH.to_string(),
            declared_name: "a".to_string(),
            alias: A_ALIAS.to_string(),
            used: true,
        }],
        methods,
        implementation_type: local("Greeter"),
    }
}

fn emit_builtin(descriptor: &InterfaceDescriptor, options: &EmitOptions) -> String {
    emit(descriptor, options, &Canonical::default()).unwrap()
}

/// Formatter that refuses everything.
struct Rejecting;

impl SourceFormatter for Rejecting {
    fn format(&self, _source: &str) -> Result<FormatResult, FormatError> {
        Err(FormatError::External {
            program: "reject".to_string(),
            stderr: "no".to_string(),
        })
    }

    fn name(&self) -> &str {
        "reject"
    }
}

#[test]
fn test_single_method_proxy() {
    let greeter = descriptor(vec![method("Greet", vec![prim("string")], vec![prim("string")])]);
    let output = emit_builtin(&greeter, &EmitOptions::new("proxies", "GreeterProxy"));
    let expected = "\
// Code generated by proxygen. DO NOT EDIT.

package proxies

import (
\tproxygenCaster \"github.com/panagiotisptr/proxygen/caster\"
\tproxygenInterceptors \"github.com/panagiotisptr/proxygen/interceptor\"

\timportaGreeter0 \"example.com/p/a\"
)

type GreeterProxy struct {
\tImplementation importaGreeter0.Greeter
\tInterceptors   proxygenInterceptors.InterceptorChain
}

var _ importaGreeter0.Greeter = (*GreeterProxy)(nil)

func (this *GreeterProxy) Greet(arg0 string) string {
\trets := this.Interceptors.Apply(
\t\t[]interface{}{arg0},
\t\t\"Greet\",
\t\tfunc(args []interface{}) []interface{} {
\t\t\tres0 := this.Implementation.Greet(proxygenCaster.Cast[string](args[0]))
\t\t\treturn []interface{}{res0}
\t\t},
\t)
\treturn proxygenCaster.Cast[string](rets[0])
}
";
    assert_eq!(output, expected);
}

#[test]
fn test_multiple_results_are_cast_in_order() {
    let counter = descriptor(vec![method(
        "Count",
        Vec::new(),
        vec![prim("int"), prim("error")],
    )]);
    let output = emit_builtin(&counter, &EmitOptions::new("proxies", "CounterProxy"));
    let expected = "\
func (this *CounterProxy) Count() (int, error) {
\trets := this.Interceptors.Apply(
\t\t[]interface{}{},
\t\t\"Count\",
\t\tfunc(args []interface{}) []interface{} {
\t\t\tres0, res1 := this.Implementation.Count()
\t\t\treturn []interface{}{res0, res1}
\t\t},
\t)
\treturn proxygenCaster.Cast[int](rets[0]), proxygenCaster.Cast[error](rets[1])
}
";
    assert!(output.ends_with(expected), "{output}");
}

#[test]
fn test_zero_result_method_returns_after_apply() {
    let logger = descriptor(vec![method("Log", vec![prim("string")], Vec::new())]);
    let output = emit_builtin(&logger, &EmitOptions::new("proxies", "LoggerProxy"));
    let expected = "\
func (this *LoggerProxy) Log(arg0 string) {
\tthis.Interceptors.Apply(
\t\t[]interface{}{arg0},
\t\t\"Log\",
\t\tfunc(args []interface{}) []interface{} {
\t\t\tthis.Implementation.Log(proxygenCaster.Cast[string](args[0]))
\t\t\treturn []interface{}{}
\t\t},
\t)
}
";
    assert!(output.ends_with(expected), "{output}");
}

#[test]
fn test_variadic_parameters_are_spread() {
    let math = descriptor(vec![method(
        "Sum",
        vec![
            prim("string"),
            TypeExpression::Variadic(Box::new(prim("float64"))),
        ],
        vec![prim("float64")],
    )]);
    let output = emit_builtin(&math, &EmitOptions::new("proxies", "MathProxy"));
    assert!(output.contains("func (this *MathProxy) Sum(arg0 string, arg1 ...float64) float64 {\n"));
    assert!(output.contains("\t\t[]interface{}{arg0, arg1},\n"));
    assert!(output.contains(
        "res0 := this.Implementation.Sum(proxygenCaster.Cast[string](args[0]), proxygenCaster.Cast[[]float64](args[1])...)\n"
    ));
}

#[test]
fn test_methods_follow_descriptor_order() {
    let logger = descriptor(vec![
        method("Log", vec![prim("string")], Vec::new()),
        method("Greet", vec![prim("string")], vec![prim("string")]),
    ]);
    let output = emit_builtin(&logger, &EmitOptions::new("proxies", "LoggerProxy"));
    let log = output.find(") Log(").unwrap();
    let greet = output.find(") Greet(").unwrap();
    assert!(log < greet);
}

#[test]
fn test_caster_is_only_imported_when_needed() {
    let closer = descriptor(vec![method("Close", Vec::new(), Vec::new())]);
    let output = emit_builtin(&closer, &EmitOptions::new("proxies", "CloserProxy"));
    assert!(!output.contains("proxygenCaster"));
    assert!(output.contains("proxygenInterceptors \"github.com/panagiotisptr/proxygen/interceptor\""));
}

#[test]
fn test_unused_imports_are_left_out() {
    let mut greeter = descriptor(vec![method("Greet", vec![prim("string")], vec![prim("string")])]);
    greeter.imports.push(ImportBinding {
        module_path: "context".to_string(),
        declared_name: "context".to_string(),
        alias: "importaGreeter1".to_string(),
        used: false,
    });
    let output = emit_builtin(&greeter, &EmitOptions::new("proxies", "GreeterProxy"));
    assert!(!output.contains("\"context\""));
}

#[test]
fn test_same_package_drops_the_self_import() {
    let repo = descriptor(vec![method(
        "Find",
        vec![prim("int")],
        vec![TypeExpression::Pointer(Box::new(local("User"))), prim("error")],
    )]);
    let output = emit_builtin(&repo, &EmitOptions::new("a", "GreeterProxy"));
    assert!(!output.contains(A_ALIAS));
    assert!(!output.contains(A_PATH));
    assert!(output.contains("\tImplementation Greeter\n"));
    assert!(output.contains("var _ Greeter = (*GreeterProxy)(nil)\n"));
    assert!(output.contains("func (this *GreeterProxy) Find(arg0 int) (*User, error) {\n"));
    assert!(output.contains("proxygenCaster.Cast[*User](rets[0])"));
}

#[test]
fn test_package_path_decides_same_package() {
    let greeter = descriptor(vec![method("Greet", vec![prim("string")], vec![prim("string")])]);
    // Same name, different import path: still a foreign package.
    let options = EmitOptions::new("a", "GreeterProxy").with_package_path("example.com/q/a");
    let output = emit_builtin(&greeter, &options);
    assert!(output.contains("importaGreeter0 \"example.com/p/a\""));
}

#[test]
fn test_render_is_unformatted_template() {
    let greeter = descriptor(vec![method("Greet", vec![prim("string")], vec![prim("string")])]);
    let rendered = render(&greeter, &EmitOptions::new("proxies", "GreeterProxy")).unwrap();
    assert!(rendered.starts_with(HEADER));
    assert!(rendered.contains("\n    rets := this.Interceptors.Apply(\n"));
    assert!(rendered.lines().all(|line| line == line.trim_end()));
}

#[test]
fn test_formatter_rejection() {
    let greeter = descriptor(vec![method("Greet", vec![prim("string")], vec![prim("string")])]);
    let err = emit(&greeter, &EmitOptions::new("proxies", "GreeterProxy"), &Rejecting).unwrap_err();
    match err {
        EmitError::Formatting {
            formatter,
            generated,
            ..
        } => {
            assert_eq!(formatter, "reject");
            assert!(generated.starts_with(HEADER));
        }
        other => panic!("expected formatting error, got {other:?}"),
    }
}

#[test]
fn test_invalid_names_are_rejected() {
    let greeter = descriptor(Vec::new());
    for (package, name) in [("proxies", "2Proxy"), ("func", "Proxy"), ("proxies", "_"), ("my-pkg", "P")] {
        let err = render(&greeter, &EmitOptions::new(package, name)).unwrap_err();
        assert!(
            matches!(err, EmitError::InvalidIdentifier { .. }),
            "{package} {name}: {err:?}"
        );
    }
}

#[test]
fn test_method_named_like_a_field() {
    let odd = descriptor(vec![method("Interceptors", Vec::new(), Vec::new())]);
    let err = render(&odd, &EmitOptions::new("proxies", "P")).unwrap_err();
    assert!(matches!(err, EmitError::FieldClash { .. }));
}

#[test]
fn test_proxy_cannot_shadow_the_interface() {
    let greeter = descriptor(Vec::new());
    let err = render(&greeter, &EmitOptions::new("a", "Greeter")).unwrap_err();
    assert!(matches!(err, EmitError::TypeNameClash { .. }));
    // Fine when the proxy lives elsewhere.
    assert!(render(&greeter, &EmitOptions::new("proxies", "Greeter")).is_ok());
}

#[test]
fn test_runtime_names_must_be_distinct() {
    let greeter = descriptor(vec![method("Greet", vec![prim("string")], vec![prim("string")])]);
    let mut options = EmitOptions::new("proxies", "GreeterProxy");
    options.runtime.caster_name = A_ALIAS.to_string();
    let err = render(&greeter, &options).unwrap_err();
    assert!(matches!(err, EmitError::ImportNameClash { .. }));
}

#[test]
fn test_identifier_check() {
    assert!(is_identifier("Proxy"));
    assert!(is_identifier("héllo"));
    assert!(!is_identifier(""));
    assert!(!is_identifier("a.b"));
    assert!(!is_identifier("type"));
}
