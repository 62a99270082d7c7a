use crate::client::controller::{Effect, SubmissionMachine, SubmissionStatus};
use crate::client::{dispatch, ClientConfig};
use crate::models::review::ReviewSubmission;
use crate::utils::leptos_owner::with_owner_safe;
use gloo_timers::callback::Timeout;
use leptos::logging::{log, warn};
use leptos::*;

/// The movie review form. Calls `on_submitted` once the list should be
/// re-read after a successful submission.
#[component]
pub fn ReviewForm(on_submitted: Callback<()>) -> impl IntoView {
    let config = store_value(use_context::<ClientConfig>().unwrap_or_default());
    let (name, set_name) = create_signal(String::new());
    let (movie_name, set_movie_name) = create_signal(String::new());
    let (movie_review, set_movie_review) = create_signal(String::new());
    let (status, set_status) = create_signal(SubmissionStatus::Idle);
    let machine = store_value(SubmissionMachine::default());
    let refresh_timer = store_value(None::<Timeout>);
    let reset_timer = store_value(None::<Timeout>);
    let owner = Owner::current();

    // Pending timers must not fire into an unmounted form.
    on_cleanup(move || {
        refresh_timer.try_update_value(|timer| timer.take().map(Timeout::cancel));
        reset_timer.try_update_value(|timer| timer.take().map(Timeout::cancel));
    });

    let sync_status = move || {
        if let Some(current) = machine.try_with_value(|m| m.status().clone()) {
            set_status.try_set(current);
        }
    };

    let apply = move |effects: Vec<Effect>| {
        for effect in effects {
            match effect {
                Effect::ClearForm => {
                    set_name.set(String::new());
                    set_movie_name.set(String::new());
                    set_movie_review.set(String::new());
                }
                Effect::ScheduleRefresh { after } => {
                    let timer = Timeout::new(after.as_millis() as u32, move || {
                        with_owner_safe(owner, "review list refresh", move || {
                            on_submitted.call(());
                            if machine.try_update_value(|m| m.refreshed()).unwrap_or(false) {
                                sync_status();
                            }
                        });
                    });
                    refresh_timer.try_update_value(|slot| *slot = Some(timer));
                }
                Effect::ScheduleReset { after, generation } => {
                    let timer = Timeout::new(after.as_millis() as u32, move || {
                        if machine.try_update_value(|m| m.reset(generation)).unwrap_or(false) {
                            sync_status();
                        }
                    });
                    reset_timer.try_update_value(|slot| *slot = Some(timer));
                }
            }
        }
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if !machine.try_update_value(SubmissionMachine::submit).unwrap_or(false) {
            return;
        }
        sync_status();

        let submission = ReviewSubmission::new(
            &name.get_untracked(),
            &movie_name.get_untracked(),
            &movie_review.get_untracked(),
        );
        let config = config.get_value();

        spawn_local(async move {
            let effects = match dispatch::submit(&config, &submission).await {
                Ok(submitted) => {
                    if let Some(warning) = submitted.warning {
                        warn!("[CLIENT] Review kept by the forms collection only: {}", warning);
                    }
                    log!("[CLIENT] Review submitted");
                    machine.try_update_value(|m| m.succeeded())
                }
                Err(e) => {
                    log!("[CLIENT] Review submission failed: {}", e);
                    machine.try_update_value(|m| m.failed(e.to_string()))
                }
            };
            if let Some(effects) = effects {
                sync_status();
                apply(effects);
            }
        });
    };

    let busy = move || status.with(|s| *s == SubmissionStatus::Submitting);
    let status_class = move || match status.get() {
        SubmissionStatus::Success => "status success",
        SubmissionStatus::Error(_) => "status error",
        _ => "status",
    };

    view! {
        <div class="form-container">
            <h2>{ "Movie Review Form" }</h2>
            <form name="movie-review" on:submit=on_submit>
                <p>
                    <label>
                        "Your Name: "
                        <input
                            type="text"
                            name="name"
                            required=true
                            prop:value=name
                            prop:disabled=busy
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                        />
                    </label>
                </p>
                <p>
                    <label>
                        "Movie Name: "
                        <input
                            type="text"
                            name="movie-name"
                            required=true
                            prop:value=movie_name
                            prop:disabled=busy
                            on:input=move |ev| set_movie_name.set(event_target_value(&ev))
                        />
                    </label>
                </p>
                <p>
                    <label>
                        "Movie Review: "
                        <textarea
                            name="movie-review"
                            rows="5"
                            required=true
                            prop:value=movie_review
                            prop:disabled=busy
                            on:input=move |ev| set_movie_review.set(event_target_value(&ev))
                        ></textarea>
                    </label>
                </p>
                <p>
                    <button type="submit" disabled=busy>
                        {move || if busy() { "Submitting..." } else { "Submit Review" }}
                    </button>
                </p>
            </form>
            {move || {
                status
                    .with(|s| s.message().map(str::to_string))
                    .map(|message| view! { <p class=status_class>{message}</p> })
            }}
        </div>
    }
}
