//! Auth Page
//!
//! Login and registration form shown until a session exists.

use leptos::*;

use chemviz::dashboard::{AuthGate, AuthMode};

use crate::state::global::GlobalState;

#[component]
pub fn AuthPage() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let gate = create_rw_signal(AuthGate::new());

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let Some(request) = gate.try_update(|g| g.begin_submit()).flatten() else {
            return;
        };

        spawn_local(async move {
            let api = state.gateway();
            let result = request.send(&api).await;
            let Some(session) = gate.try_update(|g| g.finish_submit(result)).flatten() else {
                return;
            };
            if let Err(e) = state.sign_in(session) {
                gate.update(|g| g.fail(e.to_string()));
            }
        });
    };

    let is_register = move || gate.with(|g| g.mode() == AuthMode::Register);

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex items-center justify-center px-4">
            <div class="w-full max-w-md bg-gray-800 rounded-xl p-8 border border-gray-700 space-y-6">
                <div class="text-center space-y-2">
                    <span class="text-4xl">"⚗️"</span>
                    <h1 class="text-2xl font-bold">{move || gate.with(|g| g.mode().heading())}</h1>
                    <p class="text-gray-400">{move || gate.with(|g| g.mode().subtitle())}</p>
                </div>

                {move || gate.with(|g| g.error().map(str::to_string)).map(|msg| view! {
                    <div class="bg-red-900/50 border border-red-700 text-red-300 rounded-lg px-4 py-3 text-sm">
                        {msg}
                    </div>
                })}

                <form on:submit=submit class="space-y-4">
                    <div>
                        <label class="block text-sm text-gray-400 mb-2">"Username"</label>
                        <input
                            type="text"
                            prop:value=move || gate.with(|g| g.username().to_string())
                            on:input=move |ev| gate.update(|g| g.set_username(event_target_value(&ev)))
                            class="w-full bg-gray-700 rounded-lg px-4 py-3
                                   border border-gray-600 focus:border-primary-500 focus:outline-none"
                        />
                    </div>

                    <Show when=is_register>
                        <div>
                            <label class="block text-sm text-gray-400 mb-2">"Email (optional)"</label>
                            <input
                                type="email"
                                prop:value=move || gate.with(|g| g.email().to_string())
                                on:input=move |ev| gate.update(|g| g.set_email(event_target_value(&ev)))
                                class="w-full bg-gray-700 rounded-lg px-4 py-3
                                       border border-gray-600 focus:border-primary-500 focus:outline-none"
                            />
                        </div>
                    </Show>

                    <div>
                        <label class="block text-sm text-gray-400 mb-2">"Password"</label>
                        <input
                            type="password"
                            prop:value=move || gate.with(|g| g.password().to_string())
                            on:input=move |ev| gate.update(|g| g.set_password(event_target_value(&ev)))
                            class="w-full bg-gray-700 rounded-lg px-4 py-3
                                   border border-gray-600 focus:border-primary-500 focus:outline-none"
                        />
                    </div>

                    <button
                        type="submit"
                        disabled=move || gate.with(AuthGate::is_submitting)
                        class="w-full py-3 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                               rounded-lg font-semibold transition-colors"
                    >
                        {move || gate.with(AuthGate::submit_label)}
                    </button>
                </form>

                <button
                    type="button"
                    on:click=move |_| gate.update(AuthGate::toggle_mode)
                    class="w-full text-sm text-primary-400 hover:text-primary-300"
                >
                    {move || gate.with(|g| g.mode().switch_prompt())}
                </button>
            </div>
        </div>
    }
}
