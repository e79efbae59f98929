//! App Root Component
//!
//! Auth gate, then the dashboard shell with one page per tab.

use chrono::Datelike;
use leptos::*;

use chemviz::dashboard::Tab;

use crate::components::{RightPanel, Sidebar, Toast};
use crate::pages::{AuthPage, ChartsPage, TablePage, UploadPage};
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();

    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let signed_in = create_memo(move |_| state.is_signed_in());

    view! {
        {move || {
            if signed_in.get() {
                view! { <Shell /> }.into_view()
            } else {
                view! { <AuthPage /> }.into_view()
            }
        }}

        // Toast notifications
        <Toast />
    }
}

/// Signed-in layout
#[component]
fn Shell() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    // Re-selecting the current tab keeps its page mounted
    let tab = create_memo(move |_| state.tab.get());

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <Header />

            <div class="flex-1 flex flex-col md:flex-row">
                <Sidebar />

                // Only the selected page is mounted; switching tabs mounts a fresh one
                <main class="flex-1 px-4 py-8 pb-24">
                    {move || match tab.get() {
                        Tab::Upload => view! { <UploadPage /> }.into_view(),
                        Tab::Charts => view! { <ChartsPage /> }.into_view(),
                        Tab::Table => view! { <TablePage /> }.into_view(),
                    }}
                </main>

                <div class="px-4 py-8">
                    <RightPanel />
                </div>
            </div>

            <Footer />
        </div>
    }
}

/// Header bar with page title and the signed-in user
#[component]
fn Header() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <header class="bg-gray-800 border-b border-gray-700">
            <div class="px-4 flex items-center justify-between h-16">
                <div class="flex items-center space-x-6">
                    <span class="flex items-center space-x-3">
                        <span class="text-2xl">"⚗️"</span>
                        <span class="text-xl font-bold">"Chemical Visualizer"</span>
                    </span>
                    <h1 class="text-lg text-gray-300">{move || state.tab.get().title()}</h1>
                </div>

                <div class="flex items-center space-x-4">
                    <span class="text-gray-300">
                        {move || state.username().unwrap_or_default()}
                    </span>
                    <button
                        on:click=move |_| state.logout()
                        class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg text-sm font-medium transition-colors"
                    >
                        "Logout"
                    </button>
                </div>
            </div>
        </header>
    }
}

#[component]
fn Footer() -> impl IntoView {
    let year = chrono::Utc::now().year();

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="flex items-center justify-between text-sm text-gray-400">
                <span>{format!("© {} Chemical Equipment Visualizer", year)}</span>
                <span>"Upload, chart and report on equipment datasets"</span>
            </div>
        </footer>
    }
}
