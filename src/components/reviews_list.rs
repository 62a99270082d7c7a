use crate::client::http::fetch_reviews;
use crate::client::listing::{Notice, POLL_INTERVAL};
use crate::client::ClientConfig;
use crate::models::review::ReviewView;
use gloo_timers::callback::Interval;
use leptos::*;

/// Table of submitted reviews. Re-reads the list whenever `refresh` changes
/// and on a fixed polling interval.
#[component]
pub fn ReviewsList(refresh: ReadSignal<u32>) -> impl IntoView {
    let endpoint = store_value(use_context::<ClientConfig>().unwrap_or_default().list_endpoint);
    let (reviews, set_reviews) = create_signal(Vec::<ReviewView>::new());
    let (notice, set_notice) = create_signal(None::<Notice>);
    let poller = store_value(None::<Interval>);

    let load = move || {
        let Some(url) = endpoint.try_get_value() else {
            return;
        };
        spawn_local(async move {
            let (list, note) = fetch_reviews(&url).await.into_parts();
            set_reviews.try_set(list);
            set_notice.try_set(note);
        });
    };

    // Effects only run in the browser, so nothing is fetched during SSR.
    create_effect(move |_| {
        let _ = refresh.get();
        load();
    });
    create_effect(move |_| {
        let interval = Interval::new(POLL_INTERVAL.as_millis() as u32, load);
        poller.try_update_value(|slot| *slot = Some(interval));
    });
    on_cleanup(move || {
        poller.try_update_value(|slot| slot.take().map(Interval::cancel));
    });

    view! {
        <div class="reviews">
            <h3>{ "Reviews" }</h3>
            {move || {
                notice.get().map(|notice| {
                    let class = if notice.is_error { "notice error" } else { "notice" };
                    view! { <p class=class>{notice.text}</p> }
                })
            }}
            {move || {
                if reviews.with(Vec::is_empty) {
                    view! { <p class="empty">{ "No reviews yet." }</p> }.into_view()
                } else {
                    view! {
                        <table>
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Movie"</th>
                                    <th>"Review"</th>
                                    <th>"Submitted"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {reviews
                                    .get()
                                    .into_iter()
                                    .map(|review| {
                                        view! {
                                            <tr>
                                                <td>{review.name}</td>
                                                <td>{review.movie_name}</td>
                                                <td>{review.movie_review}</td>
                                                <td>{review.submitted_at.unwrap_or_default()}</td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                    }
                        .into_view()
                }
            }}
        </div>
    }
}
