//! Integration Tests for Gates and the Reactive Host
//!
//! These tests drive the public API end to end: plain gates, conjunctions,
//! and gated memos, computeds and effects reacting to signal changes.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;

use lattice_gate::reactive::{
    untrack, ComputationOptions, Effect, Memo, ReactiveContext, ReactiveError, Signal,
    SubscriberId,
};
use lattice_gate::{
    check, check_or_else, every, when, when_computed_or_else, when_effect, when_memo, whenify,
    ComputeFn, MaybeValue, Value,
};

/// A falsy input never reaches the callback; a present one reaches it once.
#[test]
fn check_runs_callback_only_for_present_values() {
    let calls = Arc::new(AtomicI32::new(0));

    for input in [Value::Null, Value::from(0), Value::from(""), Value::from(5)] {
        let calls = calls.clone();
        check(input, move |v| {
            calls.fetch_add(1, Ordering::SeqCst);
            v
        });
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// `when` forwards the call's arguments after the present value.
#[test]
fn when_forwards_call_arguments() {
    let gated = when(Value::from("a"), |v: Value, (x, y): (i32, i32)| {
        format!("{v:?} {}", x + y)
    });
    assert_eq!(gated((2, 3)), Some(r#"String("a") 5"#.to_string()));

    let closed = when(Value::Undefined, |v: Value, (x, y): (i32, i32)| {
        format!("{v:?} {}", x + y)
    });
    assert_eq!(closed((2, 3)), None);
}

/// All-present conjunction keeps order and object identity.
#[test]
fn every_preserves_order_and_identity() {
    let obj = Value::object::<&str>([]);
    let combined = every((Value::from(1), Value::from("a"), obj.clone()));

    let (one, a, same) = combined.resolve().expect("all present");
    assert_eq!(one, Value::from(1));
    assert_eq!(a, Value::from("a"));
    assert!(same.is_same(&obj));

    let broken = every((Value::from(1), Value::from(0), Value::from("a")));
    assert_eq!(broken.resolve(), None);
}

/// A gated computed follows its signal through both branches.
#[test]
fn gated_computed_tracks_toggling_signal() {
    let cb = Arc::new(AtomicI32::new(0));
    let fb = Arc::new(AtomicI32::new(0));
    let (cb_clone, fb_clone) = (cb.clone(), fb.clone());
    let source = Signal::new(Value::Null);

    let output = when_computed_or_else(
        source.clone(),
        move |v: Value, _prev| {
            cb_clone.fetch_add(1, Ordering::SeqCst);
            match v {
                Value::Number(n) => n * 2.0,
                _ => f64::NAN,
            }
        },
        move |_prev| {
            fb_clone.fetch_add(1, Ordering::SeqCst);
            -1.0
        },
    );

    let mut seen = vec![output.get()];
    for next in [Value::from(5), Value::from(7), Value::Null] {
        source.set(next);
        seen.push(output.get());
    }

    assert_eq!(seen, vec![-1.0, 10.0, 14.0, -1.0]);
    assert_eq!(cb.load(Ordering::SeqCst), 2);
    assert_eq!(fb.load(Ordering::SeqCst), 2);
}

/// JSON input flows through the same truthiness rules.
#[test]
fn json_inputs_gate_like_dynamic_values() {
    let doc = json!({"name": "ada", "score": 0});

    assert_eq!(check(doc["name"].clone(), |v| v.to_string()), Some("\"ada\"".to_string()));
    assert_eq!(check(doc["score"].clone(), |_| "scored"), None);
    assert_eq!(check(doc["missing"].clone(), |_| "found"), None);
    assert!(check(Value::from(doc), |v| v.kind()).is_some());
}

/// A gated memo recomputes only when read after a change.
#[test]
fn gated_memo_is_lazy() {
    let runs = Arc::new(AtomicI32::new(0));
    let runs_clone = runs.clone();
    let source = Signal::new(2i32);

    let squared = when_memo(source.clone(), move |n, _prev| {
        runs_clone.fetch_add(1, Ordering::SeqCst);
        n * n
    });
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    assert_eq!(squared.get(), Some(4));
    assert_eq!(squared.get(), Some(4));
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    source.set(3);
    source.set(4);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(squared.get(), Some(16));
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// A gated effect reruns on changes and stops once dropped.
#[test]
fn gated_effect_lifecycle() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_clone = log.clone();
    let user = Signal::new(None::<String>);

    let effect = when_effect(user.clone(), move |name, prev: Option<usize>| {
        log_clone.lock().push(format!("{name} after {prev:?}"));
        prev.unwrap_or(0) + 1
    });

    user.set(Some("ada".to_string()));
    user.set(Some("grace".to_string()));
    user.set(None);
    user.set(Some("alan".to_string()));

    drop(effect);
    user.set(Some("ignored".to_string()));

    assert_eq!(
        *log.lock(),
        vec![
            "ada after None".to_string(),
            "grace after Some(1)".to_string(),
            "alan after None".to_string(),
        ]
    );
}

/// A producer input reading several signals registers all of them.
#[test]
fn producer_input_tracks_every_signal_it_reads() {
    let first = Signal::new(1i32);
    let second = Signal::new(0i32);
    let (first_clone, second_clone) = (first.clone(), second.clone());
    let product = MaybeValue::producer(move || first_clone.get() * second_clone.get());

    let runs = Arc::new(AtomicI32::new(0));
    let runs_clone = runs.clone();
    let _effect = whenify(|compute: ComputeFn<Option<()>>| Effect::new(compute)).when(
        product,
        move |_, _prev| {
            runs_clone.fetch_add(1, Ordering::SeqCst);
        },
    );
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    second.set(3);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    first.set(2);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// Reads inside `untrack` register nothing.
#[test]
fn untracked_reads_do_not_subscribe() {
    let tracked = Signal::new(1i32);
    let hidden = Signal::new(10i32);
    let (tracked_clone, hidden_clone) = (tracked.clone(), hidden.clone());

    let runs = Arc::new(AtomicI32::new(0));
    let runs_clone = runs.clone();
    let _effect = Effect::new(move |_| {
        runs_clone.fetch_add(1, Ordering::SeqCst);
        let _ = tracked_clone.get() + untrack(|| hidden_clone.get());
    });

    hidden.set(20);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    tracked.set(2);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// Memos chained on memos propagate changes to an effect.
#[test]
fn memo_chain_drives_effect() {
    let base = Signal::new(5i32);
    let base_clone = base.clone();
    let doubled = Memo::new(move |_| base_clone.get() * 2);
    let doubled_clone = doubled.clone();
    let plus_ten = Memo::new(move |_| doubled_clone.get() + 10);

    let observed = Arc::new(AtomicI32::new(0));
    let observed_clone = observed.clone();
    let plus_ten_clone = plus_ten.clone();
    let _effect = Effect::new(move |_| {
        observed_clone.store(plus_ten_clone.get(), Ordering::SeqCst);
    });
    assert_eq!(observed.load(Ordering::SeqCst), 20);

    base.set(10);
    assert_eq!(observed.load(Ordering::SeqCst), 30);
}

/// A memo that reads itself reports a cycle instead of recursing.
#[test]
fn self_reading_memo_reports_cycle() {
    let slot: Arc<Mutex<Option<Memo<i32>>>> = Arc::new(Mutex::new(None));
    let slot_clone = slot.clone();
    let memo = Memo::with_options(
        move |_| {
            let me = slot_clone.lock().clone();
            me.map_or(0, |m| m.try_get().unwrap_or(-1))
        },
        ComputationOptions::new().name("ouroboros"),
    );
    *slot.lock() = Some(memo.clone());

    assert_eq!(memo.try_get(), Ok(-1));

    let err = ReactiveError::Cycle {
        name: "ouroboros".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "cycle detected: memo `ouroboros` read itself while computing"
    );
}

/// Nested tracking contexts attribute reads to the innermost subscriber.
#[test]
fn nested_reactive_contexts() {
    let (outer_id, inner_id) = (SubscriberId::new(), SubscriberId::new());

    let _outer = ReactiveContext::enter(outer_id);
    assert_eq!(ReactiveContext::current_subscriber(), Some(outer_id));

    {
        let _inner = ReactiveContext::enter(inner_id);
        assert_eq!(ReactiveContext::current_subscriber(), Some(inner_id));
        assert!(ReactiveContext::is_running(outer_id));
        assert!(ReactiveContext::is_running(inner_id));
    }

    assert_eq!(ReactiveContext::current_subscriber(), Some(outer_id));
    assert!(!ReactiveContext::is_running(inner_id));
}

/// An effect reading a signal and a memo of it runs once per change.
#[test]
fn effect_over_signal_and_memo_runs_once_per_set() {
    let source = Signal::new(1i32);
    let source_clone = source.clone();
    let doubled = Memo::new(move |_| source_clone.get() * 2);

    let runs = Arc::new(AtomicI32::new(0));
    let runs_clone = runs.clone();
    let _effect = when_effect(every((source.clone(), doubled)), move |(n, d), _prev| {
        assert_eq!(d, n * 2);
        runs_clone.fetch_add(1, Ordering::SeqCst);
    });

    for next in 2..=5 {
        source.set(next);
    }
    assert_eq!(runs.load(Ordering::SeqCst), 5);
}

/// A memo read from another thread mid-compute waits instead of failing.
#[test]
fn memo_shared_across_threads() {
    let slow = Memo::new(|_| {
        std::thread::sleep(std::time::Duration::from_millis(200));
        "ready"
    });

    let background = slow.clone();
    let reader = std::thread::spawn(move || background.try_get());
    std::thread::sleep(std::time::Duration::from_millis(50));

    assert_eq!(slow.try_get(), Ok("ready"));
    assert_eq!(reader.join().expect("reader thread panicked"), Ok("ready"));
}

/// `check_or_else` picks exactly one branch for dynamic inputs.
#[test]
fn check_or_else_branches() {
    let describe = |v: Value| check_or_else(v, |v| v.kind().to_string(), || "absent".to_string());

    assert_eq!(describe(Value::array([])), "array");
    assert_eq!(describe(Value::from(f64::NAN)), "absent");
    assert_eq!(describe(Value::from(-0.0)), "absent");
    assert_eq!(describe(Value::from("0")), "string");
}
