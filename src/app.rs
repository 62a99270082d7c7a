/// Main application entry point for the movie review site.
/// Combines the review form and the review list on a single page.
use crate::client::{ClientConfig, DeployTarget};
use crate::components::{review_form::ReviewForm, reviews_list::ReviewsList};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    // Endpoint selection is fixed for the lifetime of the page.
    provide_context(ClientConfig::for_target(DeployTarget::from_build_env()));

    view! {
        <Title text="Movie Reviews"/>
        <Router>
            <main>
                <Routes>
                    <Route path="" view=HomePage/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    // Bumped by the form whenever the list should be re-read.
    let (refresh, set_refresh) = create_signal(0u32);
    let on_submitted = Callback::new(move |_: ()| set_refresh.update(|n| *n += 1));

    view! {
        <div class="container">
            <h1>{ "Movie Reviews" }</h1>
            <ReviewForm on_submitted=on_submitted />
            <ReviewsList refresh=refresh />
        </div>
    }
}
