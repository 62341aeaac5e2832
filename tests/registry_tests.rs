//! Registry misuse, result access rules, and configuration.

use forkstream::{Error, ForkConfig, NoticeTable, StreamForks};

#[test]
fn test_duplicate_key_is_rejected() {
    let mut forks = StreamForks::new(vec![1, 2, 3]);
    forks.fork("k", |s| s.count()).unwrap();

    let err = forks.fork("k", |s| s.sum::<i32>()).err().expect("duplicate");
    assert!(matches!(err, Error::DuplicateKey { ref key, .. } if key == "\"k\""));
    assert_eq!(forks.len(), 1);

    // the original registration is the one that runs
    let results = forks.execute().unwrap();
    assert_eq!(*results.get::<usize>(&"k").unwrap(), 3);
}

#[test]
fn test_registration_after_execute_is_rejected() {
    let mut forks = StreamForks::new(vec![1, 2, 3]);
    forks.fork("a", |s| s.count()).unwrap();
    let _results = forks.execute().unwrap();
    assert!(forks.is_started());

    let err = forks.fork("b", |s| s.count()).err().expect("late registration");
    assert!(matches!(err, Error::AlreadyStarted { .. }));
    let err = forks.try_fork("c", |s| Ok::<_, std::io::Error>(s.count())).err().expect("late");
    assert!(matches!(err, Error::AlreadyStarted { .. }));
}

#[test]
fn test_second_execute_fails_deterministically() {
    let mut forks = StreamForks::new(vec![1, 2, 3]);
    forks.fork("a", |s| s.count()).unwrap();
    let results = forks.execute().unwrap();

    for _ in 0..3 {
        let err = forks.execute().err().expect("second execute");
        assert!(matches!(err, Error::AlreadyStarted { .. }));
        assert!(err.is_misuse());
    }
    assert_eq!(*results.get::<usize>(&"a").unwrap(), 3);
}

#[test]
fn test_get_is_idempotent() {
    let mut forks = StreamForks::new(vec![5u8, 6, 7]);
    forks.fork("v", |s| s.collect::<Vec<u8>>()).unwrap();
    let results = forks.execute().unwrap();

    let first = results.get::<Vec<u8>>(&"v").unwrap();
    let second = results.get::<Vec<u8>>(&"v").unwrap();
    assert_eq!(first, &vec![5, 6, 7]);
    assert!(std::ptr::eq(first, second), "no re-execution, same stored value");
}

#[test]
fn test_take_moves_result_out_once() {
    let mut forks = StreamForks::new(vec![1, 2, 3]);
    forks
        .fork("list", |s| s.collect::<Vec<i32>>())
        .unwrap()
        .fork("other", |s| s.count())
        .unwrap();
    let mut results = forks.execute().unwrap();

    let list: Vec<i32> = results.take(&"list").unwrap();
    assert_eq!(list, vec![1, 2, 3]);

    assert!(matches!(results.get::<Vec<i32>>(&"list"), Err(Error::AlreadyTaken { .. })));
    assert!(matches!(results.take::<Vec<i32>>(&"list"), Err(Error::AlreadyTaken { .. })));
    // other forks are unaffected and wait_all skips taken slots
    results.wait_all();
    assert_eq!(results.take::<usize>(&"other").unwrap(), 3);
}

#[test]
fn test_type_mismatch_leaves_result_in_place() {
    let mut forks = StreamForks::new(vec![1u32, 2]);
    forks.fork("sum", |s| s.sum::<u32>()).unwrap();
    let mut results = forks.execute().unwrap();

    let err = results.get::<String>(&"sum").unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { expected, .. } if expected.contains("String")));

    assert!(matches!(results.take::<u64>(&"sum"), Err(Error::TypeMismatch { .. })));
    assert_eq!(results.take::<u32>(&"sum").unwrap(), 3);
}

#[test]
fn test_custom_notice_table_renders_messages() {
    let notices = NoticeTable {
        unknown_key: |key| format!("nothing forked as {key}"),
        duplicate_key: |key| format!("{key} twice"),
        ..NoticeTable::default()
    };
    let mut forks = StreamForks::new(vec![1])
        .with_config(ForkConfig::default().with_notices(notices));
    forks.fork(7u16, |s| s.count()).unwrap();

    let dup = forks.fork(7u16, |s| s.count()).err().expect("duplicate");
    assert_eq!(dup.to_string(), "7 twice");

    let results = forks.execute().unwrap();
    let unknown = results.get::<usize>(&9).unwrap_err();
    assert_eq!(unknown.to_string(), "nothing forked as 9");
}

#[test]
fn test_invalid_config_is_reported_before_start() {
    let mut forks = StreamForks::new(vec![1, 2])
        .with_config(ForkConfig::default().with_thread_name_prefix(""));
    forks.fork("a", |s| s.count()).unwrap();

    assert!(matches!(forks.execute(), Err(Error::Config(_))));
    assert!(!forks.is_started());
}

#[test]
fn test_workers_run_on_named_threads() {
    let mut forks = StreamForks::new(vec![0u8; 4])
        .with_config(ForkConfig::default().with_thread_name_prefix("replay"));
    for key in ["first", "second"] {
        forks
            .fork(key, |s| {
                s.for_each(drop);
                std::thread::current().name().map(str::to_owned)
            })
            .unwrap();
    }
    let caller = std::thread::current().id();
    forks
        .fork("third", move |s| {
            s.for_each(drop);
            std::thread::current().id() != caller
        })
        .unwrap();

    let results = forks.execute().unwrap();
    assert_eq!(
        results.get::<Option<String>>(&"first").unwrap().as_deref(),
        Some("replay-0")
    );
    assert_eq!(
        results.get::<Option<String>>(&"second").unwrap().as_deref(),
        Some("replay-1")
    );
    assert!(*results.get::<bool>(&"third").unwrap());
}

#[test]
fn test_config_round_trips_through_json() {
    let cfg: ForkConfig = serde_json::from_str(
        r#"{"thread_name_prefix":"w","worker_stack_size":1048576,"traversal_policy":"truncate"}"#,
    )
    .unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.thread_name(2), "w-2");
    assert_eq!(cfg.worker_stack_size, Some(1 << 20));

    let mut forks = StreamForks::new(1..=3).with_config(cfg);
    forks.fork("n", |s| s.count()).unwrap();
    assert_eq!(*forks.execute().unwrap().get::<usize>(&"n").unwrap(), 3);
}
