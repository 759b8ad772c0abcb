//! Cost of a full session: spawn, drain both pipes, reap.

use criterion::{Criterion, criterion_group, criterion_main};
use jibjab_toolchain::{CommandSpec, SessionIo, SessionManager};

fn bench_short_session(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let manager = SessionManager::new();
    let manager = &manager;
    c.bench_function("session_echo", |b| {
        b.to_async(&rt).iter(|| async move {
            let handle = manager
                .start(
                    CommandSpec::new("/bin/sh").args(["-c", "echo out; echo err >&2"]),
                    SessionIo::Batch,
                )
                .await;
            match handle {
                Ok(handle) => handle.wait().await.is_ok(),
                Err(_) => false,
            }
        })
    });
}

criterion_group!(benches, bench_short_session);
criterion_main!(benches);
