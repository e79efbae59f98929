//! Upload Page
//!
//! Drop zone and file picker, followed by the summary of the last upload.

use leptos::*;
use wasm_bindgen_futures::JsFuture;

use chemviz::api::ApiGateway;
use chemviz::dashboard::{UploadStatus, UploadView};
use chemviz::upload::{FileKind, UploadFile};

use crate::api::log_failure;
use crate::components::{InlineLoading, SummaryCards};
use crate::state::global::GlobalState;

#[component]
pub fn UploadPage() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let upload = create_rw_signal(UploadView::new());
    let file_input = create_node_ref::<html::Input>();

    let start_upload = move |file: web_sys::File| {
        let name = file.name();
        let Some(kind) = upload.try_update(|u| u.select(&name)).flatten() else {
            return;
        };

        spawn_local(async move {
            let bytes = match read_bytes(&file).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    state.show_error(&e);
                    return;
                }
            };

            let file = UploadFile::new(name, kind, bytes);
            if !upload.try_update(|u| u.begin_upload(&file)).unwrap_or(false) {
                return;
            }

            let api = state.gateway();
            let session = state.current_session();
            let result = api.upload(session.as_ref(), &file).await;
            if let Err(e) = &result {
                log_failure("Upload failed", e);
            }
            let succeeded = result.is_ok();
            upload.update(|u| u.finish_upload(result));

            if succeeded {
                state.show_success("File uploaded successfully");
            }
        });
    };

    let on_drop = move |ev: ev::DragEvent| {
        ev.prevent_default();
        upload.update(|u| u.set_dragging(false));
        if let Some(file) = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0))
        {
            start_upload(file);
        }
    };

    let on_change = move |_| {
        let Some(input) = file_input.get() else {
            return;
        };
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            start_upload(file);
        }
        // Allow picking the same file again
        input.set_value("");
    };

    let open_picker = move |_| {
        if upload.with(UploadView::is_busy) {
            return;
        }
        if let Some(input) = file_input.get() {
            input.click();
        }
    };

    view! {
        <div class="space-y-8">
            <input
                type="file"
                accept=FileKind::accept_attribute()
                node_ref=file_input
                on:change=on_change
                class="hidden"
            />

            <div
                on:click=open_picker
                on:dragover=move |ev: ev::DragEvent| {
                    ev.prevent_default();
                    upload.update(|u| u.set_dragging(true));
                }
                on:dragleave=move |_| upload.update(|u| u.set_dragging(false))
                on:drop=on_drop
                class=move || {
                    let base = "border-2 border-dashed rounded-xl p-12 text-center cursor-pointer transition-colors";
                    if upload.with(UploadView::is_dragging) {
                        format!("{} border-primary-500 bg-gray-800", base)
                    } else {
                        format!("{} border-gray-600 hover:border-primary-500", base)
                    }
                }
            >
                {move || upload.with(|u| match u.status() {
                    UploadStatus::Uploading { file } => view! {
                        <div class="flex flex-col items-center space-y-3">
                            <InlineLoading />
                            <p class="text-gray-300">{format!("Uploading {}...", file)}</p>
                        </div>
                    }.into_view(),
                    _ => view! {
                        <div class="flex flex-col items-center space-y-2">
                            <span class="text-5xl">"📁"</span>
                            <p class="text-lg font-medium">"Drag & drop a file here, or click to browse"</p>
                            <p class="text-sm text-gray-400">"Supported formats: CSV, Excel (.xlsx, .xls)"</p>
                        </div>
                    }.into_view(),
                })}
            </div>

            {move || upload.with(|u| u.error().map(str::to_string)).map(|msg| view! {
                <div class="bg-red-900/50 border border-red-700 text-red-300 rounded-lg px-4 py-3">
                    {msg}
                </div>
            })}

            {move || upload.with(|u| u.result().cloned()).map(|summary| {
                let bars = upload.with(UploadView::bars);
                view! {
                    <section class="space-y-6">
                        <h2 class="text-xl font-semibold">"Upload Summary"</h2>
                        <SummaryCards summary=summary />

                        <div class="bg-gray-800 rounded-xl p-6 border border-gray-700 space-y-3">
                            <h3 class="font-semibold">"Equipment Type Distribution"</h3>
                            {bars.into_iter().map(|bar| view! {
                                <div class="space-y-1">
                                    <div class="flex justify-between text-sm">
                                        <span>{bar.name.clone()}</span>
                                        <span class="text-gray-400">{bar.count}</span>
                                    </div>
                                    <div class="w-full h-2 bg-gray-700 rounded-full">
                                        <div
                                            class="h-2 bg-primary-500 rounded-full"
                                            style=format!("width: {:.1}%", bar.percent())
                                        />
                                    </div>
                                </div>
                            }).collect_view()}
                        </div>
                    </section>
                }
            })}
        </div>
    }
}

/// Read a picked file into memory
async fn read_bytes(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read file: {:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
