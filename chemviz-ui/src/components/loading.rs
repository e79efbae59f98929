//! Loading Component
//!
//! Loading spinners for pages and buttons.

use leptos::*;

/// Page-level loading spinner with a caption
#[component]
pub fn Loading(
    #[prop(default = "Loading data...")]
    label: &'static str,
) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12 space-y-3">
            <div class="loading-spinner w-8 h-8" />
            <span class="text-gray-400 text-sm">{label}</span>
        </div>
    }
}

/// Inline loading spinner
#[component]
pub fn InlineLoading() -> impl IntoView {
    view! {
        <span class="inline-block loading-spinner w-4 h-4" />
    }
}

/// Error panel with a retry button
#[component]
pub fn ErrorState<F>(
    #[prop(into)]
    message: String,
    on_retry: F,
) -> impl IntoView
where
    F: Fn() + 'static,
{
    view! {
        <div class="flex flex-col items-center justify-center py-12 space-y-4 text-center">
            <span class="text-4xl">"⚠️"</span>
            <p class="text-red-400">{message}</p>
            <button
                on:click=move |_| on_retry()
                class="px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Retry"
            </button>
        </div>
    }
}

/// Placeholder shown when there is no history yet
#[component]
pub fn EmptyState(
    icon: &'static str,
    hint: &'static str,
) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12 space-y-2 text-center">
            <span class="text-5xl">{icon}</span>
            <h3 class="text-xl font-semibold">"No Data Available"</h3>
            <p class="text-gray-400">{hint}</p>
        </div>
    }
}
