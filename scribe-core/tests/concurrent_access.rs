use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::{Duration, Instant};

use scribe_core::{ScribeEngine, DEMO_SCRIPT};

#[test]
fn views_taken_during_appends_are_internally_consistent() {
    let engine = Arc::new(ScribeEngine::with_builtin());
    let running = Arc::new(AtomicBool::new(true));

    let producer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for _ in 0..50 {
                for line in DEMO_SCRIPT {
                    engine.submit_utterance(line);
                }
            }
        })
    };

    let consumer = {
        let engine = Arc::clone(&engine);
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut last_revision = 0;
            let mut last_findings = 0;
            let mut views = 0usize;
            while running.load(Ordering::Relaxed) {
                let view = engine.current_view();
                assert_eq!(view.revision as usize, view.transcript.len());
                assert!(view.revision >= last_revision, "revision went backwards");
                assert!(view.findings.len() >= last_findings, "findings shrank");
                for f in &view.followups {
                    assert!(view.findings.iter().all(|known| known.name != f.id));
                }
                last_revision = view.revision;
                last_findings = view.findings.len();
                views += 1;
            }
            views
        })
    };

    producer.join().expect("producer thread panicked");
    running.store(false, Ordering::SeqCst);
    let views = consumer.join().expect("consumer thread panicked");

    assert!(views > 0);
    let final_view = engine.current_view();
    assert_eq!(final_view.transcript.len(), 50 * DEMO_SCRIPT.len());
    assert_eq!(final_view.findings.len(), 3);
}

#[test]
fn current_view_stays_fast_for_an_encounter_sized_transcript() {
    let engine = ScribeEngine::with_builtin();
    for _ in 0..40 {
        for line in DEMO_SCRIPT {
            engine.submit_utterance(line);
        }
    }

    let start = Instant::now();
    let view = engine.current_view();
    let elapsed = start.elapsed();

    assert_eq!(view.transcript.len(), 200);
    assert!(
        elapsed < Duration::from_millis(500),
        "view build too slow: {:?} (polling interval is 500ms)",
        elapsed
    );
}
