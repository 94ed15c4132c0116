//! Values computed from other observables.

use std::sync::Arc;

use super::observable::{Observable, Subscription};

/// An observable computed by a pure function of its sources.
///
/// Recomputes on every source change, reading every source at the
/// instant of the triggering change. Dropping it unsubscribes from all
/// sources.
pub struct Derived<U> {
    output: Observable<U>,
    _sources: Vec<Subscription>,
}

impl<U: Clone + Send + Sync + 'static> Derived<U> {
    pub fn get(&self) -> Option<U> {
        self.output.get()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&U) + Send + Sync + 'static,
    {
        self.output.subscribe(callback)
    }

    pub fn dispose(self) {}
}

impl<U: Clone + Send + Sync + 'static> AsRef<Observable<U>> for Derived<U> {
    fn as_ref(&self) -> &Observable<U> {
        &self.output
    }
}

impl<U: std::fmt::Debug> std::fmt::Debug for Derived<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Derived")
            .field("output", &self.output)
            .field("sources", &self._sources.len())
            .finish()
    }
}

/// Derive from one source.
pub fn map<T, U, S, F>(source: &S, f: F) -> Derived<U>
where
    T: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
    S: AsRef<Observable<T>>,
    F: Fn(&T) -> U + Send + Sync + 'static,
{
    let output = Observable::new();
    let sink = output.clone();
    let subscription = source.as_ref().subscribe(move |value| sink.set(f(value)));
    Derived {
        output,
        _sources: vec![subscription],
    }
}

/// Derive from two sources; publishes once both have a value.
pub fn map2<A, B, U, SA, SB, F>(first: &SA, second: &SB, f: F) -> Derived<U>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
    SA: AsRef<Observable<A>>,
    SB: AsRef<Observable<B>>,
    F: Fn(&A, &B) -> U + Send + Sync + 'static,
{
    let output = Observable::new();
    let f = Arc::new(f);
    let first = first.as_ref().clone();
    let second = second.as_ref().clone();

    let subscription_a = {
        let (sink, f, other) = (output.clone(), Arc::clone(&f), second.clone());
        first.subscribe(move |a| {
            if let Some(b) = other.get() {
                sink.set(f(a, &b));
            }
        })
    };
    let subscription_b = {
        let (sink, f, other) = (output.clone(), Arc::clone(&f), first.clone());
        second.subscribe(move |b| {
            if let Some(a) = other.get() {
                sink.set(f(&a, b));
            }
        })
    };

    Derived {
        output,
        _sources: vec![subscription_a, subscription_b],
    }
}

/// Derive from any number of sources of the same type; publishes once
/// every source has a value.
pub fn map_all<T, U, F>(sources: &[Observable<T>], f: F) -> Derived<U>
where
    T: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
    F: Fn(&[T]) -> U + Send + Sync + 'static,
{
    let output = Observable::new();
    let f = Arc::new(f);
    let all: Arc<Vec<Observable<T>>> = Arc::new(sources.to_vec());

    let subscriptions = sources
        .iter()
        .map(|source| {
            let (sink, f, all) = (output.clone(), Arc::clone(&f), Arc::clone(&all));
            source.subscribe(move |_| {
                let values: Option<Vec<T>> = all.iter().map(Observable::get).collect();
                if let Some(values) = values {
                    sink.set(f(&values));
                }
            })
        })
        .collect();

    Derived {
        output,
        _sources: subscriptions,
    }
}
