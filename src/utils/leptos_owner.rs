use leptos::Owner;

/// Runs a deferred callback (timer, async continuation) under the owner that
/// scheduled it. Returns None without running `f` when the owner was missing
/// or has been disposed, e.g. the component unmounted before the timer fired.
pub fn with_owner_safe<F, R>(owner: Option<Owner>, log_context: &str, f: F) -> Option<R>
where
    F: FnOnce() -> R + 'static,
    R: 'static,
{
    match owner {
        Some(owner) => leptos::try_with_owner(owner, f).ok(),
        None => {
            leptos::logging::log!("[OWNER] No Leptos owner for: {}", log_context);
            None
        }
    }
}
