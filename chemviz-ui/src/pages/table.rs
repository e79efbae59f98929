//! Table Page
//!
//! Upload history, one row per dataset, with a PDF report per row.

use leptos::*;
use wasm_bindgen::{JsCast, JsValue};

use chemviz::api::ApiGateway;
use chemviz::dashboard::{LoadState, TableView};
use chemviz::models::{DatasetId, DatasetSummary, Report};

use crate::api::{bytes_to_blob, log_failure};
use crate::components::{EmptyState, ErrorState, Loading, SummaryCards};
use crate::state::global::GlobalState;

/// Owned copy of one row, detached from the view state
#[derive(Clone)]
struct RowData {
    index: usize,
    number: usize,
    dataset_id: DatasetId,
    summary: DatasetSummary,
    badges: Vec<String>,
}

#[component]
pub fn TablePage() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let table = create_rw_signal(TableView::new());

    let load = move || {
        table.update(TableView::begin_load);
        spawn_local(async move {
            let api = state.gateway();
            let session = state.current_session();
            let result = api.list_history(session.as_ref()).await;
            if let Err(e) = &result {
                log_failure("Failed to load history", e);
            }
            table.update(|t| t.finish_load(result));
        });
    };

    let download = move |index: usize| {
        let Some(dataset_id) = table.try_update(|t| t.begin_download(index)).flatten() else {
            return;
        };

        spawn_local(async move {
            let api = state.gateway();
            let session = state.current_session();
            let result = api.fetch_report(session.as_ref(), dataset_id).await;
            if let Err(e) = &result {
                log_failure("Report download failed", e);
            }

            match table.try_update(|t| t.finish_download(index, result)).flatten() {
                Some(report) => {
                    if let Err(e) = save_report(&report) {
                        web_sys::console::error_1(&e);
                    }
                }
                None => {
                    if let Some(message) = table.with(|t| t.download_error().map(str::to_string)) {
                        state.show_error(&message);
                        table.update(TableView::dismiss_download_error);
                    }
                }
            }
        });
    };

    // Fetch on mount
    load();

    let rows = move || {
        table.with(|t| {
            t.rows()
                .into_iter()
                .map(|row| RowData {
                    index: row.number - 1,
                    number: row.number,
                    dataset_id: row.dataset_id,
                    summary: row.summary.clone(),
                    badges: row.badges,
                })
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h2 class="text-xl font-semibold">"Upload History"</h2>
                <button
                    on:click=move |_| load()
                    disabled=move || table.with(|t| t.history().is_loading())
                    class="px-4 py-2 bg-gray-700 hover:bg-gray-600 disabled:bg-gray-800
                           rounded-lg text-sm font-medium transition-colors"
                >
                    "🔄 Refresh"
                </button>
            </div>

            {move || table.with(|t| match t.history() {
                LoadState::Loading => view! { <Loading /> }.into_view(),
                LoadState::Failed(message) => view! {
                    <ErrorState message=message.clone() on_retry=load />
                }.into_view(),
                LoadState::Loaded(history) if history.is_empty() => view! {
                    <EmptyState icon="📋" hint="Upload a CSV file to populate the table" />
                }.into_view(),
                LoadState::Loaded(_) => ().into_view(),
            })}

            {move || table.with(|t| t.latest().cloned()).map(|latest| view! {
                <section class="space-y-3">
                    <h3 class="text-lg font-semibold">"Latest Dataset Summary"</h3>
                    <SummaryCards summary=latest />
                </section>
            })}

            <Show when=move || !rows().is_empty()>
                <div class="bg-gray-800 rounded-xl border border-gray-700 overflow-x-auto">
                    <table class="w-full text-sm">
                        <thead class="bg-gray-700 text-gray-300">
                            <tr>
                                <th class="px-4 py-3 text-left">"#"</th>
                                <th class="px-4 py-3 text-left">"Total Equipment"</th>
                                <th class="px-4 py-3 text-left">"Avg Flowrate"</th>
                                <th class="px-4 py-3 text-left">"Avg Pressure"</th>
                                <th class="px-4 py-3 text-left">"Avg Temperature"</th>
                                <th class="px-4 py-3 text-left">"Equipment Types"</th>
                                <th class="px-4 py-3 text-left">"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=rows
                                key=|row| (row.number, row.dataset_id)
                                children=move |row| view! { <TableRow row=row table=table on_download=download /> }
                            />
                        </tbody>
                    </table>
                </div>

                <p class="text-sm text-gray-400">{move || table.with(TableView::footer)}</p>
            </Show>
        </div>
    }
}

#[component]
fn TableRow<F>(row: RowData, table: RwSignal<TableView>, on_download: F) -> impl IntoView
where
    F: Fn(usize) + Copy + 'static,
{
    let index = row.index;
    let summary = row.summary;

    view! {
        <tr class="border-t border-gray-700">
            <td class="px-4 py-3">{row.number}</td>
            <td class="px-4 py-3">{summary.total_equipment}</td>
            <td class="px-4 py-3">{summary.avg_flowrate}</td>
            <td class="px-4 py-3">{summary.avg_pressure}</td>
            <td class="px-4 py-3">{summary.avg_temperature}</td>
            <td class="px-4 py-3">
                <div class="flex flex-wrap gap-1">
                    {row.badges.into_iter().map(|badge| view! {
                        <span class="px-2 py-1 bg-gray-700 rounded-full text-xs">{badge}</span>
                    }).collect_view()}
                </div>
            </td>
            <td class="px-4 py-3">
                <button
                    on:click=move |_| on_download(index)
                    disabled=move || table.with(|t| t.is_downloading(index))
                    class="px-3 py-1 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                           rounded-lg text-xs font-medium transition-colors"
                >
                    {move || table.with(|t| t.download_label(index))}
                </button>
            </td>
        </tr>
    }
}

/// Hand the report bytes to the browser as a file download
fn save_report(report: &Report) -> Result<(), JsValue> {
    let blob = bytes_to_blob(&report.bytes, "application/pdf")?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let anchor = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(JsValue::from)?;

    anchor.set_href(&url);
    anchor.set_download(&report.filename());
    anchor.click();

    web_sys::Url::revoke_object_url(&url)
}
