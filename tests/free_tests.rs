//! Integration tests for Free<F, A>.
//!
//! Tests cover:
//! - Building and interpreting programs over user-defined vocabularies
//! - Step-by-step normalization with resume
//! - Stack safety with a million left-nested, right-nested and
//!   step-interleaved binds
//! - Host drivers: Option and Result hosts, try_run error propagation
//! - Failing or stopping partway through, and dropping, a million-bind program
//! - Transforming programs into another vocabulary

#![cfg(feature = "control")]

use freestep::control::{Either, Free};
use freestep::typeclass::{Functor, TypeConstructor};
use rstest::rstest;

// =============================================================================
// Vocabularies
// =============================================================================

struct Log<Next> {
    message: String,
    next: Next,
}

impl<Next> TypeConstructor for Log<Next> {
    type Inner = Next;
    type WithType<B> = Log<B>;
}

impl<Next> Functor for Log<Next> {
    fn fmap<X, Y, G>(fx: Log<X>, function: G) -> Log<Y>
    where
        G: FnOnce(X) -> Y + 'static,
        X: 'static,
        Y: 'static,
    {
        Log {
            message: fx.message,
            next: function(fx.next),
        }
    }
}

fn log(message: &str) -> Free<Log<()>, ()> {
    Free::lift_f(Log {
        message: message.to_string(),
        next: (),
    })
}

fn run_log<A: 'static>(program: Free<Log<()>, A>) -> (Vec<String>, A) {
    let mut messages = Vec::new();
    let value = program.run(|step| {
        messages.push(step.message);
        step.next
    });
    (messages, value)
}

enum Counter<Next> {
    Get(Box<dyn FnOnce(i64) -> Next>),
    Put(i64, Next),
}

impl<Next> TypeConstructor for Counter<Next> {
    type Inner = Next;
    type WithType<B> = Counter<B>;
}

impl<Next> Functor for Counter<Next> {
    fn fmap<X, Y, G>(fx: Counter<X>, function: G) -> Counter<Y>
    where
        G: FnOnce(X) -> Y + 'static,
        X: 'static,
        Y: 'static,
    {
        match fx {
            Counter::Get(reply) => Counter::Get(Box::new(move |value| function(reply(value)))),
            Counter::Put(value, next) => Counter::Put(value, function(next)),
        }
    }
}

fn get() -> Free<Counter<()>, i64> {
    Free::lift_f(Counter::Get(Box::new(|value: i64| value)))
}

fn put(value: i64) -> Free<Counter<()>, ()> {
    Free::lift_f(Counter::Put(value, ()))
}

fn increment() -> Free<Counter<()>, ()> {
    get().flat_map(|value| put(value + 1))
}

fn run_counter<A: 'static>(program: Free<Counter<()>, A>, initial: i64) -> (A, i64) {
    let mut state = initial;
    let value = program.run(|step| match step {
        Counter::Get(reply) => reply(state),
        Counter::Put(value, next) => {
            state = value;
            next
        }
    });
    (value, state)
}

// =============================================================================
// Interpretation
// =============================================================================

#[rstest]
fn log_scenario_returns_value_and_messages_in_order() {
    let program = log("a").then(log("b")).then(Free::pure(42));
    let (messages, value) = run_log(program);
    assert_eq!(messages, vec!["a", "b"]);
    assert_eq!(value, 42);
}

#[rstest]
fn pure_program_never_calls_interpreter() {
    let mut calls = 0;
    let program: Free<Log<()>, &str> = Free::pure("done");
    let value = program.run(|step| {
        calls += 1;
        step.next
    });
    assert_eq!(value, "done");
    assert_eq!(calls, 0);
}

#[rstest]
#[case(0, 3)]
#[case(10, 13)]
#[case(-5, -2)]
fn counter_program_threads_state(#[case] initial: i64, #[case] expected: i64) {
    let program = increment()
        .then(increment())
        .then(increment())
        .then(get());
    assert_eq!(run_counter(program, initial), (expected, expected));
}

#[rstest]
fn continuation_sees_answer_of_previous_step() {
    let program = get().flat_map(|before| {
        put(before * 2).flat_map(move |()| get().map(move |after| (before, after)))
    });
    assert_eq!(run_counter(program, 21), ((21, 42), 42));
}

#[rstest]
fn interpreter_sees_each_step_exactly_once() {
    let program = (0..5).fold(Free::pure(()), |program, index| {
        program.then(log(&format!("step {index}")))
    });
    let (messages, ()) = run_log(program);
    assert_eq!(
        messages,
        vec!["step 0", "step 1", "step 2", "step 3", "step 4"]
    );
}

// =============================================================================
// Resume
// =============================================================================

fn describe(program: Free<Log<()>, i32>) -> (Vec<String>, i32) {
    let mut messages = Vec::new();
    let mut current = program;
    loop {
        match current.resume() {
            Either::Left(step) => {
                messages.push(step.message);
                current = step.next;
            }
            Either::Right(value) => return (messages, value),
        }
    }
}

fn sample_program() -> Free<Log<()>, i32> {
    log("open")
        .flat_map(|()| Free::pure(20))
        .flat_map(|n| log("compute").map(move |()| n * 2))
        .flat_map(|n| log("close").then(Free::pure(n + 2)))
}

#[rstest]
fn resume_is_deterministic_for_identical_programs() {
    let first = describe(sample_program());
    let second = describe(sample_program());
    assert_eq!(first, second);
    assert_eq!(
        first,
        (vec!["open".into(), "compute".into(), "close".into()], 42)
    );
}

#[rstest]
fn resume_reaches_first_step_through_nested_binds() {
    let program = Free::pure(1)
        .flat_map(|n| Free::pure(n + 1))
        .flat_map(|n| Free::pure(n + 1))
        .flat_map(|n| log(&format!("value {n}")));

    match program.resume() {
        Either::Left(step) => {
            assert_eq!(step.message, "value 3");
            assert!(step.next.resume().is_right());
        }
        Either::Right(()) => panic!("expected a pending step"),
    }
}

// =============================================================================
// Stack Safety
// =============================================================================

const DEPTH: u64 = 1_000_000;

#[rstest]
fn left_nested_binds_are_stack_safe() {
    let program: Free<Log<()>, u64> = (0..DEPTH).fold(Free::pure(0), |program, _| {
        program.flat_map(|n| Free::pure(n + 1))
    });
    assert_eq!(run_log(program), (Vec::new(), DEPTH));
}

#[rstest]
fn right_nested_binds_are_stack_safe() {
    fn count(n: u64, total: u64) -> Free<Log<()>, u64> {
        if n == 0 {
            Free::pure(total)
        } else {
            Free::pure(n).flat_map(move |k| count(k - 1, total + 1))
        }
    }

    assert_eq!(run_log(count(DEPTH, 0)), (Vec::new(), DEPTH));
}

#[rstest]
fn right_nested_steps_are_stack_safe() {
    fn repeat(n: u64) -> Free<Counter<()>, ()> {
        if n == 0 {
            Free::pure(())
        } else {
            increment().flat_map(move |()| repeat(n - 1))
        }
    }

    let (_, state) = run_counter(repeat(DEPTH), 0);
    assert_eq!(state, i64::try_from(DEPTH).unwrap());
}

#[rstest]
fn left_nested_steps_are_stack_safe() {
    let program = (0..DEPTH).fold(Free::pure(()), |program, _| program.then(increment()));
    let (_, state) = run_counter(program, 0);
    assert_eq!(state, i64::try_from(DEPTH).unwrap());
}

#[rstest]
fn continuations_returning_deep_chains_are_stack_safe() {
    fn deep(value: i64) -> Free<Counter<()>, i64> {
        (0..1_000).fold(Free::pure(value), |program, _| program.map(|n| n + 1))
    }

    let program = (0..1_000).fold(Free::pure(()), |program, _| {
        program.then(get().flat_map(deep).flat_map(put))
    });
    let (_, state) = run_counter(program, 0);
    assert_eq!(state, 1_000_000);
}

#[rstest]
fn defer_chain_is_stack_safe() {
    fn countdown(n: u64) -> Free<Log<()>, u64> {
        if n == 0 {
            Free::pure(0)
        } else {
            Free::defer(move || countdown(n - 1)).map(|k| k + 1)
        }
    }

    assert_eq!(run_log(countdown(DEPTH)).1, DEPTH);
}

// =============================================================================
// Host Drivers
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
enum CounterError {
    Overflow(i64),
}

impl std::fmt::Display for CounterError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overflow(value) => write!(formatter, "counter overflowed at {value}"),
        }
    }
}

impl std::error::Error for CounterError {}

fn bounded_interpreter(
    limit: i64,
    state: &mut i64,
    interpreted: &mut usize,
    step: Counter<Free<Counter<()>, ()>>,
) -> Result<Free<Counter<()>, ()>, CounterError> {
    *interpreted += 1;
    match step {
        Counter::Get(reply) => Ok(reply(*state)),
        Counter::Put(value, _) if value > limit => Err(CounterError::Overflow(value)),
        Counter::Put(value, next) => {
            *state = value;
            Ok(next)
        }
    }
}

#[rstest]
#[case(10, Ok(()), 5)]
#[case(3, Err(CounterError::Overflow(4)), 3)]
fn try_run_stops_at_first_error(
    #[case] limit: i64,
    #[case] expected: Result<(), CounterError>,
    #[case] final_state: i64,
) {
    let program = (0..5).fold(Free::pure(()), |program, _| program.then(increment()));
    let mut state = 0;
    let mut interpreted = 0;

    let result = program.try_run(|step| {
        bounded_interpreter(limit, &mut state, &mut interpreted, step)
    });

    assert_eq!(result, expected);
    assert_eq!(state, final_state);
    // Each increment is a Get and a Put; nothing runs after the failing Put.
    let expected_steps = usize::try_from(final_state).unwrap() * 2 + usize::from(result.is_err()) * 2;
    assert_eq!(interpreted, expected_steps);
}

#[rstest]
fn try_run_error_displays_cause() {
    let program = put(100);
    let mut state = 0;
    let mut interpreted = 0;
    let error = program
        .try_run(|step| bounded_interpreter(0, &mut state, &mut interpreted, step))
        .unwrap_err();
    assert_eq!(error.to_string(), "counter overflowed at 100");
}

#[rstest]
fn run_in_host_option_stops_at_first_none() {
    let program = log("keep").then(log("drop")).then(log("unreached"));
    let mut seen = Vec::new();

    let result = program.run_in_host::<Option<()>, _>(|step| {
        seen.push(step.message.clone());
        (step.message != "drop").then_some(step.next)
    });

    assert_eq!(result, None);
    assert_eq!(seen, vec!["keep", "drop"]);
}

#[rstest]
fn run_in_host_result_matches_run() {
    let via_result = sample_program().run_in_host::<Result<(), String>, _>(|step| Ok(step.next));
    let via_run = sample_program().run(|step| step.next);
    assert_eq!(via_result, Ok(via_run));
}

// =============================================================================
// Abandoned Programs
// =============================================================================

/// Runs `body` on a thread whose stack is far too small for one frame per
/// bind of a `DEPTH`-long program.
fn on_small_stack<T: Send + 'static>(body: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(512 * 1024)
        .spawn(body)
        .expect("failed to spawn test thread")
        .join()
        .expect("test thread panicked")
}

fn deep_after_get(depth: u64) -> Free<Counter<()>, i64> {
    (0..depth).fold(get(), |program, _| program.flat_map(|n| Free::pure(n + 1)))
}

#[rstest]
fn try_run_returns_error_from_first_step_of_deep_program() {
    let result = on_small_stack(|| {
        deep_after_get(DEPTH).try_run(|_| Err(CounterError::Overflow(-1)))
    });
    assert_eq!(result, Err(CounterError::Overflow(-1)));
}

#[rstest]
fn try_run_returns_error_halfway_through_deep_program() {
    let limit = i64::try_from(DEPTH / 2).unwrap();
    let (result, state, interpreted) = on_small_stack(move || {
        let program = (0..DEPTH).fold(Free::pure(()), |program, _| program.then(increment()));
        let mut state = 0;
        let mut interpreted = 0;
        let result = program.try_run(|step| {
            bounded_interpreter(limit, &mut state, &mut interpreted, step)
        });
        (result, state, interpreted)
    });

    assert_eq!(result, Err(CounterError::Overflow(limit + 1)));
    assert_eq!(state, limit);
    assert_eq!(interpreted, usize::try_from(limit).unwrap() * 2 + 2);
}

#[rstest]
fn run_in_host_option_stops_deep_program_at_none() {
    let (result, interpreted) = on_small_stack(|| {
        let mut interpreted = 0;
        let result = deep_after_get(DEPTH).run_in_host::<Option<()>, _>(|_| {
            interpreted += 1;
            None
        });
        (result, interpreted)
    });
    assert_eq!(result, None);
    assert_eq!(interpreted, 1);
}

#[rstest]
fn dropping_unrun_deep_program_is_stack_safe() {
    on_small_stack(|| drop(deep_after_get(DEPTH)));
}

#[rstest]
fn dropping_pending_step_of_deep_program_is_stack_safe() {
    let pending = on_small_stack(|| match deep_after_get(DEPTH).resume() {
        Either::Left(Counter::Get(_)) => true,
        Either::Left(Counter::Put(..)) | Either::Right(_) => false,
    });
    assert!(pending);
}

// =============================================================================
// Transform
// =============================================================================

#[rstest]
fn transform_translates_each_step() {
    let program = increment().then(increment()).then(get());

    let logged: Free<Log<()>, i64> = program.transform(|step: Counter<Free<Counter<()>, i64>>| {
        match step {
            Counter::Get(reply) => Log {
                message: "get".to_string(),
                next: reply(7),
            },
            Counter::Put(value, next) => Log {
                message: format!("put {value}"),
                next,
            },
        }
    });

    let (messages, value) = run_log(logged);
    assert_eq!(messages, vec!["get", "put 8", "get", "put 8", "get"]);
    assert_eq!(value, 7);
}

#[rstest]
fn transform_is_stack_safe() {
    let program = (0..100_000).fold(Free::pure(0u64), |program, _| {
        program.flat_map(|n| log("tick").map(move |()| n + 1))
    });
    let boxed: Free<Box<()>, u64> =
        program.transform(|step: Log<Free<Log<()>, u64>>| Box::new(step.next));

    let mut steps = 0;
    let value = boxed.run(|step| {
        steps += 1;
        *step
    });
    assert_eq!((value, steps), (100_000, 100_000));
}
