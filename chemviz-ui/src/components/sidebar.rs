//! Sidebar Component
//!
//! Tab navigation and the API connection setting.

use leptos::*;

use chemviz::dashboard::Tab;

use crate::api;
use crate::state::global::GlobalState;

/// Sidebar with one button per tab
#[component]
pub fn Sidebar() -> impl IntoView {
    view! {
        <aside class="w-full md:w-56 bg-gray-800 border-r border-gray-700 p-4 space-y-6">
            <nav class="flex md:flex-col gap-1">
                {Tab::ALL.into_iter().map(|tab| view! { <TabButton tab=tab /> }).collect_view()}
            </nav>

            <ApiSettings />
        </aside>
    }
}

/// Individual tab button
#[component]
fn TabButton(tab: Tab) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <button
            id=format!("tab-{}", tab.id())
            on:click=move |_| state.tab.set(tab)
            class=move || {
                let base = "flex items-center space-x-3 px-4 py-2 rounded-lg text-left transition-colors";
                if state.tab.get() == tab {
                    format!("{} bg-gray-700 text-white", base)
                } else {
                    format!("{} text-gray-300 hover:text-white hover:bg-gray-700", base)
                }
            }
        >
            <span>{tab.icon()}</span>
            <span>{tab.label()}</span>
        </button>
    }
}

/// API base URL, stored in the browser
#[component]
fn ApiSettings() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (api_url, set_api_url) = create_signal(api::get_api_base());

    let save_url = move |_| match api::set_api_base(&api_url.get()) {
        Ok(()) => {
            set_api_url.set(api::get_api_base());
            state.show_success("API URL saved");
        }
        Err(e) => state.show_error(&e),
    };

    view! {
        <section class="hidden md:block space-y-2">
            <label class="block text-xs uppercase tracking-wide text-gray-400">"API URL"</label>
            <input
                type="text"
                prop:value=move || api_url.get()
                on:input=move |ev| set_api_url.set(event_target_value(&ev))
                class="w-full bg-gray-700 rounded-lg px-3 py-2 text-sm
                       border border-gray-600 focus:border-primary-500 focus:outline-none"
            />
            <button
                on:click=save_url
                class="w-full px-3 py-2 bg-primary-600 hover:bg-primary-700
                       rounded-lg text-sm font-medium transition-colors"
            >
                "Save"
            </button>
        </section>
    }
}
