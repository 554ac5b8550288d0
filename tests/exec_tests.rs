use shmoptix::exec::{ArgValue, Color, ExecError, ExecutionEnvironment};
use shmoptix::ir::{Module, Param, Type};

fn env(source: &str) -> ExecutionEnvironment {
    let shader = shmoptix::compile(source).unwrap();
    ExecutionEnvironment::new(shader.module).unwrap()
}

fn assert_close(actual: Color, expected: Color) {
    for (a, e) in actual.0.iter().zip(expected.0) {
        assert!((a - e).abs() < 1e-5, "{} != {}", actual, expected);
    }
}

#[test]
fn scalar_times_color() {
    let mut env = env("surface foo(float Kd = 1) { Ci = Kd * Cs; }");
    env.run_function("foo", &[ArgValue::Float(2.0)]).unwrap();
    assert_eq!(env.color("Ci").unwrap(), Color::splat(2.0));
    assert_eq!(env.color("Cs").unwrap(), Color::splat(1.0));
}

#[test]
fn omitted_arguments_take_their_default() {
    let mut env = env("surface matte(float Kd = 2) { Ci = Kd * Cs; }");
    env.set_global("Cs", ArgValue::Color(Color::new(1.0, 0.5, 0.25)))
        .unwrap();
    env.run_function("matte", &[]).unwrap();
    assert_eq!(env.color("Ci").unwrap(), Color::new(2.0, 1.0, 0.5));
}

#[test]
fn color_arguments_are_passed_by_reference() {
    let mut env = env("surface s(color Cs, float Kd) { Ci = Kd * Cs; }");
    env.run_function(
        "s",
        &[
            ArgValue::Color(Color::new(0.5, 0.25, 1.0)),
            ArgValue::Float(4.0),
        ],
    )
    .unwrap();
    assert_eq!(env.color("Ci").unwrap(), Color::new(2.0, 1.0, 4.0));
    // The argument shadows the global; the global itself is untouched.
    assert_eq!(env.color("Cs").unwrap(), Color::splat(1.0));
}

#[test]
fn float_given_for_color_is_broadcast() {
    let mut env = env("surface s(color C) { Ci = C; }");
    env.run_function("s", &[ArgValue::Float(0.75)]).unwrap();
    assert_eq!(env.color("Ci").unwrap(), Color::splat(0.75));
}

#[test]
fn diffuse_follows_the_normal() {
    let mut env = env("surface lit() { Ci = diffuse(N) * Cs; }");
    env.run_function("lit", &[]).unwrap();
    assert_close(env.color("Ci").unwrap(), Color::splat(1.0));

    env.set_global("N", ArgValue::Color(Color::new(0.0, 0.0, -1.0)))
        .unwrap();
    env.run_function("lit", &[]).unwrap();
    assert_close(env.color("Ci").unwrap(), Color::splat(0.0));

    env.set_global("N", ArgValue::Color(Color::new(0.0, 3.0, 4.0)))
        .unwrap();
    env.run_function("lit", &[]).unwrap();
    assert_close(env.color("Ci").unwrap(), Color::splat(0.8));
}

#[test]
fn ambient_is_dark() {
    let mut env = env("surface a() { Ci = ambient(); }");
    env.set_global("Ci", ArgValue::Float(1.0)).unwrap();
    env.run_function("a", &[]).unwrap();
    assert_eq!(env.color("Ci").unwrap(), Color::splat(0.0));
}

#[test]
fn declared_normals_hold_copies() {
    let mut env = env("surface d() { normal n; n = N; Ci = n; }");
    env.run_function("d", &[]).unwrap();
    assert_eq!(env.color("Ci").unwrap(), Color::new(0.0, 0.0, 1.0));
}

#[test]
fn scalar_globals_are_stored() {
    let mut env = env("surface st(float a, float b) { s = a * b; t = 3; }");
    env.run_function("st", &[ArgValue::Float(2.0), ArgValue::Float(1.5)])
        .unwrap();
    assert_eq!(env.float("s").unwrap(), 3.0);
    assert_eq!(env.float("t").unwrap(), 3.0);
}

#[test]
fn scalar_rebinding_is_visible_to_later_statements() {
    let mut env = env("surface r(float Kd = 1, float Ks = 3) { Kd = Ks; Ci = Kd * Cs; }");
    env.run_function("r", &[]).unwrap();
    assert_eq!(env.color("Ci").unwrap(), Color::splat(3.0));
}

#[test]
fn empty_shader_leaves_globals_alone() {
    let mut env = env("surface nothing() {}");
    let before = env.dump();
    env.run_function("nothing", &[]).unwrap();
    assert_eq!(env.dump(), before);
    assert_eq!(before, "Cs: 1 1 1, Ci: 0 0 0");
}

#[test]
fn argument_errors() {
    let mut env = env("surface s(color C, float Kd) { Ci = Kd * C; }");
    assert_eq!(
        env.run_function("s", &[ArgValue::Color(Color::splat(1.0))]),
        Err(ExecError::MissingArgument {
            function: "s".to_string(),
            name: "Kd".to_string(),
        })
    );
    assert_eq!(
        env.run_function(
            "s",
            &[ArgValue::Float(1.0), ArgValue::Color(Color::splat(1.0))]
        ),
        Err(ExecError::ArgumentType {
            name: "Kd".to_string(),
            expected: Type::Float,
        })
    );
    assert!(matches!(
        env.run_function("s", &[ArgValue::Float(1.0); 3]),
        Err(ExecError::TooManyArguments {
            expected: 2,
            found: 3,
            ..
        })
    ));
    assert_eq!(
        env.run_function("missing", &[]),
        Err(ExecError::UnknownFunction("missing".to_string()))
    );
    assert_eq!(
        env.run_function("diffuse", &[]),
        Err(ExecError::UnknownFunction("diffuse".to_string()))
    );

    // A failed call leaves the environment usable.
    env.run_function("s", &[ArgValue::Float(0.5), ArgValue::Float(2.0)])
        .unwrap();
    assert_eq!(env.color("Ci").unwrap(), Color::splat(1.0));
}

#[test]
fn unbound_intrinsics_are_rejected() {
    let mut module = Module::new("test");
    module.get_or_insert_function(
        "specular",
        vec![Param {
            name: "N".to_string(),
            ty: Type::VectorPtr,
            default: None,
        }],
        Type::Vector,
    );
    assert_eq!(
        ExecutionEnvironment::new(module).unwrap_err(),
        ExecError::UnboundIntrinsic("specular".to_string())
    );
}

#[test]
fn global_access_is_typed() {
    let mut env = env("surface nothing() {}");
    assert_eq!(
        env.float("Cs"),
        Err(ExecError::GlobalType {
            name: "Cs".to_string(),
            expected: Type::Float,
        })
    );
    assert_eq!(
        env.set_global("s", ArgValue::Color(Color::splat(1.0))),
        Err(ExecError::GlobalType {
            name: "s".to_string(),
            expected: Type::Float,
        })
    );
    assert_eq!(
        env.global("P"),
        Err(ExecError::UnknownGlobal("P".to_string()))
    );
}

#[test]
fn parse_argument_values() {
    assert_eq!("0.5".parse::<ArgValue>(), Ok(ArgValue::Float(0.5)));
    assert_eq!(
        "1, 0.5,0".parse::<ArgValue>(),
        Ok(ArgValue::Color(Color::new(1.0, 0.5, 0.0)))
    );
    assert!("1,2".parse::<ArgValue>().is_err());
    assert!("red".parse::<ArgValue>().is_err());
}

#[test]
fn scalar_assigned_to_color_is_broadcast() {
    let mut env = env("surface x(float Kd) { Ci = Kd; }");
    env.run_function("x", &[ArgValue::Float(2.0)]).unwrap();
    assert_eq!(env.color("Ci").unwrap(), Color::splat(2.0));
}

#[test]
fn named_arguments() {
    let mut env = env("surface s(color C, float Kd = 2) { Ci = Kd * C; }");
    let args = [("C".to_string(), ArgValue::Color(Color::new(1.0, 0.5, 0.25)))];
    env.run_function_named("s", &args).unwrap();
    assert_eq!(env.color("Ci").unwrap(), Color::new(2.0, 1.0, 0.5));

    let args = [("Kd".to_string(), ArgValue::Float(3.0))];
    assert_eq!(
        env.run_function_named("s", &args),
        Err(ExecError::MissingArgument {
            function: "s".to_string(),
            name: "C".to_string(),
        })
    );

    let args = [("Ks".to_string(), ArgValue::Float(3.0))];
    assert_eq!(
        env.run_function_named("s", &args),
        Err(ExecError::UnknownArgument {
            function: "s".to_string(),
            name: "Ks".to_string(),
        })
    );
}
