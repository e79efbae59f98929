//! Right Panel Component
//!
//! Quick stats and recent activity, loaded once when the panel mounts.

use leptos::*;

use chemviz::api::ApiGateway;
use chemviz::dashboard::{quick_stats_from, NO_ACTIVITY_MESSAGE};
use chemviz::models::QuickStats;

use crate::api::log_failure;
use crate::components::loading::InlineLoading;
use crate::state::global::GlobalState;

#[component]
pub fn RightPanel() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (stats, set_stats) = create_signal(None::<QuickStats>);

    spawn_local(async move {
        let api = state.gateway();
        let session = state.current_session();
        let result = api.list_history(session.as_ref()).await;
        if let Err(e) = &result {
            log_failure("Quick stats unavailable", e);
        }
        set_stats.set(Some(quick_stats_from(result)));
    });

    view! {
        <aside class="w-full lg:w-72 space-y-6">
            <section class="bg-gray-800 rounded-xl p-4 border border-gray-700">
                <h3 class="text-lg font-semibold mb-3">"Quick Stats"</h3>
                {move || match stats.get() {
                    None => view! { <InlineLoading /> }.into_view(),
                    Some(s) => view! {
                        <div class="space-y-2 text-sm">
                            <div class="flex justify-between">
                                <span class="text-gray-400">"Total Uploads"</span>
                                <span class="font-bold">{s.total_uploads}</span>
                            </div>
                            <div class="flex justify-between">
                                <span class="text-gray-400">"Avg Equipment"</span>
                                <span class="font-bold">{s.avg_equipment}</span>
                            </div>
                        </div>
                    }.into_view(),
                }}
            </section>

            <section class="bg-gray-800 rounded-xl p-4 border border-gray-700">
                <h3 class="text-lg font-semibold mb-3">"Recent Activity"</h3>
                {move || {
                    let recent = stats.get().map(|s| s.recent).unwrap_or_default();
                    if recent.is_empty() {
                        view! {
                            <div class="text-center text-sm space-y-1">
                                <p class="text-gray-400">{NO_ACTIVITY_MESSAGE}</p>
                                <p class="text-gray-500">"Upload a CSV to get started"</p>
                            </div>
                        }.into_view()
                    } else {
                        recent.into_iter().map(|activity| view! {
                            <div class="flex items-start space-x-3 py-2 border-b border-gray-700 last:border-0">
                                <span>"📁"</span>
                                <div class="flex flex-col">
                                    <span class="text-sm">{activity.action}</span>
                                    <span class="text-xs text-gray-400">{activity.details}</span>
                                </div>
                            </div>
                        }).collect_view()
                    }
                }}
            </section>
        </aside>
    }
}
