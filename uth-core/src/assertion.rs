//! uth check macros.
//!
//! Every macro takes the [`Runner`](crate::Runner) first, evaluates each
//! operand exactly once, records the outcome and evaluates to it as a `bool`.
//! Nothing is formatted unless the check is actually reported.
//!
//! Parameter names are the call-site tokens of each argument. Arguments of
//! the function and method forms are handed to the callee as evaluated, and
//! are reported after the call, so pass non-`Copy` values by reference:
//!
//! ```rust,ignore
//! let mut runner = uth::Runner::new();
//! let name = String::from("uth");
//!
//! uth::check_fn!(&mut runner, is_short, &name);
//! uth::check_fn_eq!(&mut runner, 3, str::len, &name);
//! uth::check_method!(&mut runner, name, is_empty);
//! uth::check_op!(&mut runner, name.len(), <, 8);
//! ```

/// Records a plain boolean predicate.
///
/// ```rust,ignore
/// uth::check!(runner, vec.is_empty());
/// ```
#[macro_export]
macro_rules! check {
    ($runner:expr, $cond:expr $(,)?) => {{
        let __pred: bool = $cond;
        $crate::__uth_report!($runner, ::core::stringify!($cond), __pred, [])
    }};
}

/// Records `lhs == rhs`, or `|lhs - rhs| < epsilon` when an epsilon is given.
///
/// ```rust,ignore
/// uth::check_eq!(runner, i, j);
/// uth::check_eq!(runner, 4.6, 1.25, f64::EPSILON);
/// ```
#[macro_export]
macro_rules! check_eq {
    ($runner:expr, $lhs:expr, $rhs:expr $(,)?) => {
        match (&$lhs, &$rhs) {
            (__lhs, __rhs) => {
                let __pred = $crate::equals::equals(__lhs, __rhs);
                $crate::__uth_report!(
                    $runner,
                    ::core::concat!(
                        "uth::equals(",
                        ::core::stringify!($lhs),
                        ", ",
                        ::core::stringify!($rhs),
                        ")"
                    ),
                    __pred,
                    [::core::stringify!($lhs) => *__lhs, ::core::stringify!($rhs) => *__rhs]
                )
            }
        }
    };
    ($runner:expr, $lhs:expr, $rhs:expr, $epsilon:expr $(,)?) => {
        match (&$lhs, &$rhs, &$epsilon) {
            (__lhs, __rhs, __epsilon) => {
                let __pred = $crate::equals::equals_eps(__lhs, __rhs, __epsilon);
                $crate::__uth_report!(
                    $runner,
                    ::core::concat!(
                        "uth::equals(",
                        ::core::stringify!($lhs),
                        ", ",
                        ::core::stringify!($rhs),
                        ", ",
                        ::core::stringify!($epsilon),
                        ")"
                    ),
                    __pred,
                    [
                        ::core::stringify!($lhs) => *__lhs,
                        ::core::stringify!($rhs) => *__rhs,
                        ::core::stringify!($epsilon) => *__epsilon,
                    ]
                )
            }
        }
    };
}

/// Records element-wise equality of the first `count` elements of two
/// sequences (arrays, slices, vectors), optionally within an epsilon.
///
/// ```rust,ignore
/// let lhs = [1.45f32, 8.36, 1.247];
/// let rhs = [1.45f32, 8.36, 945.9];
/// uth::check_slice_eq!(runner, lhs, rhs, 2, f32::EPSILON);
/// ```
#[macro_export]
macro_rules! check_slice_eq {
    ($runner:expr, $lhs:expr, $rhs:expr, $count:expr $(,)?) => {
        match (&$lhs, &$rhs, $count) {
            (__lhs, __rhs, __count) => {
                let __pred = $crate::equals::equals_slice(
                    ::core::convert::AsRef::<[_]>::as_ref(__lhs),
                    ::core::convert::AsRef::<[_]>::as_ref(__rhs),
                    __count,
                );
                $crate::__uth_report!(
                    $runner,
                    ::core::concat!(
                        "uth::equals(",
                        ::core::stringify!($lhs),
                        ", ",
                        ::core::stringify!($rhs),
                        ", ",
                        ::core::stringify!($count),
                        ")"
                    ),
                    __pred,
                    [
                        ::core::stringify!($lhs) => *__lhs,
                        ::core::stringify!($rhs) => *__rhs,
                        ::core::stringify!($count) => __count,
                    ]
                )
            }
        }
    };
    ($runner:expr, $lhs:expr, $rhs:expr, $count:expr, $epsilon:expr $(,)?) => {
        match (&$lhs, &$rhs, $count, &$epsilon) {
            (__lhs, __rhs, __count, __epsilon) => {
                let __pred = $crate::equals::equals_slice_eps(
                    ::core::convert::AsRef::<[_]>::as_ref(__lhs),
                    ::core::convert::AsRef::<[_]>::as_ref(__rhs),
                    __count,
                    __epsilon,
                );
                $crate::__uth_report!(
                    $runner,
                    ::core::concat!(
                        "uth::equals(",
                        ::core::stringify!($lhs),
                        ", ",
                        ::core::stringify!($rhs),
                        ", ",
                        ::core::stringify!($count),
                        ", ",
                        ::core::stringify!($epsilon),
                        ")"
                    ),
                    __pred,
                    [
                        ::core::stringify!($lhs) => *__lhs,
                        ::core::stringify!($rhs) => *__rhs,
                        ::core::stringify!($count) => __count,
                        ::core::stringify!($epsilon) => *__epsilon,
                    ]
                )
            }
        }
    };
}

/// Records the `bool` returned by `func(args...)`.
///
/// ```rust,ignore
/// uth::check_fn!(runner, is_even, 4);
/// ```
#[macro_export]
macro_rules! check_fn {
    ($runner:expr, $func:expr $(, $arg:expr)* $(,)?) => {
        $crate::__uth_call!(@bind fn ($runner, $func, [$($arg),*]) [] [$($arg),*])
    };
}

/// Records `func(args...) == expected`.
///
/// ```rust,ignore
/// uth::check_fn_eq!(runner, 3.0, f64::sqrt, 9.0);
/// ```
#[macro_export]
macro_rules! check_fn_eq {
    ($runner:expr, $expected:expr, $func:expr $(, $arg:expr)* $(,)?) => {
        $crate::__uth_call!(@bind fn_eq ($runner, $expected, $func, [$($arg),*]) [] [$($arg),*])
    };
}

/// Records the `bool` returned by `caller.method(args...)`.
///
/// The caller is moved in unless given by reference.
///
/// ```rust,ignore
/// uth::check_method!(runner, &stack, is_empty);
/// uth::check_method!(runner, &mut set, insert, 5);
/// ```
#[macro_export]
macro_rules! check_method {
    ($runner:expr, $caller:expr, $method:ident $(, $arg:expr)* $(,)?) => {
        match $caller {
            #[allow(unused_mut)]
            mut __caller => $crate::__uth_call!(
                @bind method ($runner, __caller, $caller, $method, [$($arg),*]) [] [$($arg),*]
            ),
        }
    };
}

/// Records `caller.method(args...) == expected`.
///
/// ```rust,ignore
/// uth::check_method_eq!(runner, 3, &name, len);
/// ```
#[macro_export]
macro_rules! check_method_eq {
    ($runner:expr, $expected:expr, $caller:expr, $method:ident $(, $arg:expr)* $(,)?) => {
        match $caller {
            #[allow(unused_mut)]
            mut __caller => $crate::__uth_call!(
                @bind method_eq ($runner, $expected, __caller, $caller, $method, [$($arg),*]) [] [$($arg),*]
            ),
        }
    };
}

/// Records `lhs op rhs` for a comparison operator.
///
/// ```rust,ignore
/// uth::check_op!(runner, a, <, b);
/// ```
#[macro_export]
macro_rules! check_op {
    ($runner:expr, $lhs:expr, $op:tt, $rhs:expr $(,)?) => {
        match (&$lhs, &$rhs) {
            (__lhs, __rhs) => {
                let __pred: bool = *__lhs $op *__rhs;
                $crate::__uth_report!(
                    $runner,
                    ::core::concat!(
                        ::core::stringify!($lhs),
                        " ",
                        ::core::stringify!($op),
                        " ",
                        ::core::stringify!($rhs)
                    ),
                    __pred,
                    [::core::stringify!($lhs) => *__lhs, ::core::stringify!($rhs) => *__rhs]
                )
            }
        }
    };
}

/// Records `(lhs op rhs) == expected`. Operands of non-`Copy` types are
/// passed by reference, e.g. `&a, +, &b` for types with `Add` on references.
///
/// ```rust,ignore
/// uth::check_op_eq!(runner, 7, 3, +, 4);
/// ```
#[macro_export]
macro_rules! check_op_eq {
    ($runner:expr, $expected:expr, $lhs:expr, $op:tt, $rhs:expr $(,)?) => {
        match (&$lhs, &$rhs) {
            (__lhs, __rhs) => {
                let __result = *__lhs $op *__rhs;
                match &$expected {
                    __expected => {
                        let __pred: bool = __result == *__expected;
                        $crate::__uth_report!(
                            $runner,
                            ::core::concat!(
                                ::core::stringify!($lhs),
                                " ",
                                ::core::stringify!($op),
                                " ",
                                ::core::stringify!($rhs),
                                " == ",
                                ::core::stringify!($expected)
                            ),
                            __pred,
                            [
                                ::core::stringify!($lhs) => *__lhs,
                                ::core::stringify!($rhs) => *__rhs,
                                ::core::concat!(
                                    ::core::stringify!($lhs),
                                    " ",
                                    ::core::stringify!($op),
                                    " ",
                                    ::core::stringify!($rhs)
                                ) => __result,
                                ::core::stringify!($expected) => *__expected,
                            ]
                        )
                    }
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __uth_report {
    ($runner:expr, $description:expr, $pred:expr, [$($name:expr => $value:expr),* $(,)?]) => {
        $crate::runner::Runner::check(
            $runner,
            $crate::runner::Check {
                description: $description,
                file: ::core::file!(),
                line: ::core::line!(),
            },
            $pred,
            || ::std::vec![$($crate::param::Param::new($name, $crate::param_string!($value))),*],
        )
    };
}

/// Binds each call argument to its own local, one match per argument, then
/// performs the call. Every binding is named `__arg`; hygiene keeps them apart.
#[doc(hidden)]
#[macro_export]
macro_rules! __uth_call {
    (@bind fn ($runner:expr, $func:expr, [$($arg:expr),*]) [$($bound:ident)*] []) => {{
        let __pred: bool = $func($($bound),*);
        $crate::__uth_report!(
            $runner,
            ::core::concat!(::core::stringify!($func), "(", ::core::stringify!($($arg),*), ")"),
            __pred,
            [$(::core::stringify!($arg) => $bound),*]
        )
    }};
    (@bind fn_eq ($runner:expr, $expected:expr, $func:expr, [$($arg:expr),*]) [$($bound:ident)*] []) => {{
        let __result = $func($($bound),*);
        match &$expected {
            __expected => {
                let __pred: bool = __result == *__expected;
                $crate::__uth_report!(
                    $runner,
                    ::core::concat!(
                        ::core::stringify!($func),
                        "(",
                        ::core::stringify!($($arg),*),
                        ") == ",
                        ::core::stringify!($expected)
                    ),
                    __pred,
                    [
                        $(::core::stringify!($arg) => $bound,)*
                        ::core::concat!(::core::stringify!($func), "()") => __result,
                        ::core::stringify!($expected) => *__expected,
                    ]
                )
            }
        }
    }};
    (@bind method ($runner:expr, $recv:ident, $caller:expr, $method:ident, [$($arg:expr),*]) [$($bound:ident)*] []) => {{
        let __pred: bool = $recv.$method($($bound),*);
        $crate::__uth_report!(
            $runner,
            ::core::concat!(
                ::core::stringify!($caller),
                ".",
                ::core::stringify!($method),
                "(",
                ::core::stringify!($($arg),*),
                ")"
            ),
            __pred,
            [::core::stringify!($caller) => $recv, $(::core::stringify!($arg) => $bound),*]
        )
    }};
    (@bind method_eq ($runner:expr, $expected:expr, $recv:ident, $caller:expr, $method:ident, [$($arg:expr),*]) [$($bound:ident)*] []) => {{
        let __result = $recv.$method($($bound),*);
        match &$expected {
            __expected => {
                let __pred: bool = __result == *__expected;
                $crate::__uth_report!(
                    $runner,
                    ::core::concat!(
                        ::core::stringify!($caller),
                        ".",
                        ::core::stringify!($method),
                        "(",
                        ::core::stringify!($($arg),*),
                        ") == ",
                        ::core::stringify!($expected)
                    ),
                    __pred,
                    [
                        ::core::stringify!($caller) => $recv,
                        $(::core::stringify!($arg) => $bound,)*
                        ::core::concat!(
                            ::core::stringify!($caller),
                            ".",
                            ::core::stringify!($method),
                            "()"
                        ) => __result,
                        ::core::stringify!($expected) => *__expected,
                    ]
                )
            }
        }
    }};
    (@bind $mode:tt $ctx:tt [$($bound:ident)*] [$arg:expr $(, $rest:expr)*]) => {
        match $arg {
            __arg => $crate::__uth_call!(@bind $mode $ctx [$($bound)* __arg] [$($rest),*]),
        }
    };
}

#[cfg(test)]
mod test {
    use crate::{Callbacks, Counter, Options, Param, Runner, Verbosity};
    use pretty_assertions::assert_eq;
    use std::{cell::RefCell, path::PathBuf, rc::Rc};

    #[derive(Clone, Default)]
    struct Log {
        titles: Rc<RefCell<Vec<(String, String)>>>,
        params: Rc<RefCell<Vec<Vec<Param>>>>,
    }

    impl Log {
        fn last_title(&self) -> String {
            self.titles
                .borrow()
                .last()
                .map(|(description, _)| description.clone())
                .unwrap_or_default()
        }

        fn last_params(&self) -> Vec<Param> {
            self.params.borrow().last().cloned().unwrap_or_default()
        }
    }

    fn runner() -> (Runner, Log) {
        let log = Log::default();
        let mut runner = Runner::with_options(Options {
            verbosity: Verbosity::MAX,
            console_log: false,
            file_log: false,
            log_dir: PathBuf::from("Logs"),
            exit_on_failure: false,
            seed: None,
        });
        let (titles, params) = (log.titles.clone(), log.params.clone());
        runner.add_reporter(
            Callbacks::new()
                .with_title(move |title, _| {
                    titles
                        .borrow_mut()
                        .push((title.description.to_string(), title.file.to_string()))
                })
                .with_params(move |p, _| params.borrow_mut().push(p.to_vec())),
        );
        (runner, log)
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<Param> {
        pairs
            .iter()
            .map(|(name, value)| Param::new(*name, *value))
            .collect()
    }

    fn is_even(n: i32) -> bool {
        n % 2 == 0
    }

    #[derive(Debug, Default)]
    struct Stack(Vec<i32>);

    impl Stack {
        fn is_empty(&self) -> bool {
            self.0.is_empty()
        }

        fn push(&mut self, value: i32) -> bool {
            self.0.push(value);
            true
        }

        fn len(&self) -> usize {
            self.0.len()
        }
    }

    #[test]
    fn check_plain_predicate() {
        let (mut runner, log) = runner();
        let values = vec![1, 2];

        assert!(check!(&mut runner, values.len() == 2));
        assert!(!check!(&mut runner, values.is_empty()));

        assert_eq!(runner.counter(), Counter::new(1, 1));
        assert_eq!(log.last_title(), "values.is_empty()");
        assert_eq!(
            log.titles.borrow()[0].1,
            "assertion.rs",
            "file name is reduced to its last component"
        );
    }

    #[test]
    fn check_eq_reports_both_operands() {
        let (mut runner, log) = runner();
        let i = 5;
        let j = 9;

        assert!(!check_eq!(&mut runner, i, j));
        assert_eq!(log.last_title(), "uth::equals(i, j)");
        assert_eq!(log.last_params(), params(&[("i", "5"), ("j", "9")]));
        assert!(runner.is_failed());
    }

    #[test]
    fn check_eq_with_epsilon() {
        let (mut runner, log) = runner();

        assert!(!check_eq!(&mut runner, 1.0, 1.5, 0.5));
        assert!(check_eq!(&mut runner, 1.0, 1.25, 0.5));
        assert_eq!(log.last_title(), "uth::equals(1.0, 1.25, 0.5)");
        assert_eq!(
            log.last_params(),
            params(&[("1.0", "1"), ("1.25", "1.25"), ("0.5", "0.5")])
        );
    }

    #[test]
    fn check_eq_mixed_types() {
        let (mut runner, _) = runner();
        let name = String::from("uth");
        assert!(check_eq!(&mut runner, name, "uth"));
        // Operands are borrowed, not moved.
        assert_eq!(name, "uth");
    }

    #[test]
    fn check_slice_eq_compares_prefix() {
        let (mut runner, log) = runner();
        let lhs = [1.45f32, 8.36, 1.247];
        let rhs = vec![1.45f32, 8.36, 945.9];

        assert!(check_slice_eq!(&mut runner, lhs, rhs, 2));
        assert!(!check_slice_eq!(&mut runner, lhs, rhs, 3, f32::EPSILON));
        assert_eq!(log.last_title(), "uth::equals(lhs, rhs, 3, f32::EPSILON)");
        assert_eq!(log.last_params()[0], Param::new("lhs", "{ 1.45; 8.36; 1.247 }"));

        let short: &[f32] = &lhs[..1];
        assert!(!check_slice_eq!(&mut runner, short, rhs, 2));
    }

    #[test]
    fn check_fn_evaluates_arguments_once() {
        let (mut runner, log) = runner();
        let mut calls = 0;
        let mut next = || {
            calls += 1;
            calls * 2
        };

        assert!(check_fn!(&mut runner, is_even, next()));
        drop(next);
        assert_eq!(calls, 1);
        assert_eq!(log.last_title(), "is_even(next())");
        assert_eq!(log.last_params(), params(&[("next()", "2")]));
    }

    #[test]
    fn check_fn_without_arguments() {
        let (mut runner, log) = runner();
        fn always() -> bool {
            true
        }

        assert!(check_fn!(&mut runner, always));
        assert_eq!(log.last_title(), "always()");
        assert_eq!(log.last_params(), vec![]);
    }

    #[test]
    fn check_fn_eq_reports_result_and_expected() {
        let (mut runner, log) = runner();
        let name = String::from("uth");

        assert!(check_fn_eq!(&mut runner, 3.0, f64::sqrt, 9.0));
        assert_eq!(log.last_title(), "f64::sqrt(9.0) == 3.0");
        assert_eq!(
            log.last_params(),
            params(&[("9.0", "9"), ("f64::sqrt()", "3"), ("3.0", "3")])
        );

        assert!(!check_fn_eq!(&mut runner, 4, str::len, &name));
        assert_eq!(
            log.last_params(),
            params(&[("&name", "uth"), ("str::len()", "3"), ("4", "4")])
        );
    }

    #[test]
    fn check_method_by_reference_and_by_value() {
        let (mut runner, log) = runner();
        let mut stack = Stack::default();

        assert!(check_method!(&mut runner, &stack, is_empty));
        assert_eq!(log.last_title(), "&stack.is_empty()");

        assert!(check_method!(&mut runner, &mut stack, push, 4));
        assert_eq!(stack.len(), 1);
        assert_eq!(log.last_params()[1], Param::new("4", "4"));

        assert!(!check_method!(&mut runner, Stack(vec![1]), is_empty));
        assert_eq!(runner.counter(), Counter::new(2, 1));
    }

    #[test]
    fn check_method_eq_reports_result() {
        let (mut runner, log) = runner();
        let stack = Stack(vec![1, 2]);

        assert!(check_method_eq!(&mut runner, 2, &stack, len));
        assert_eq!(log.last_title(), "&stack.len() == 2");
        assert_eq!(
            log.last_params(),
            params(&[
                ("&stack", "Stack([1, 2])"),
                ("&stack.len()", "2"),
                ("2", "2")
            ])
        );
    }

    #[test]
    fn check_op_forms() {
        let (mut runner, log) = runner();
        let a = 3;
        let b = 4;

        assert!(check_op!(&mut runner, a, <, b));
        assert_eq!(log.last_title(), "a < b");
        assert!(!check_op!(&mut runner, a, >=, b));

        assert!(check_op_eq!(&mut runner, 7, a, +, b));
        assert_eq!(log.last_title(), "a + b == 7");
        assert_eq!(
            log.last_params(),
            params(&[("a", "3"), ("b", "4"), ("a + b", "7"), ("7", "7")])
        );
        assert_eq!(runner.counter(), Counter::new(2, 1));
    }

    #[test]
    fn silent_passes_skip_formatting() {
        let (mut runner, log) = runner();
        runner.set_verbosity(Verbosity::PARAMS_ON_FAILURE);

        check_eq!(&mut runner, 1, 1);
        check_fn!(&mut runner, is_even, 2);
        assert!(log.titles.borrow().is_empty());

        check_fn!(&mut runner, is_even, 3);
        assert_eq!(log.last_title(), "is_even(3)");
        assert_eq!(log.last_params(), params(&[("3", "3")]));
    }
}
