//! Stat Card Component
//!
//! One labelled figure, and the four-card block for a dataset summary.

use leptos::*;

use chemviz::models::DatasetSummary;

/// Single figure with icon and label
#[component]
pub fn StatCard(
    icon: &'static str,
    label: &'static str,
    /// Preformatted value
    #[prop(into)]
    value: String,
) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700 flex items-center space-x-4">
            <span class="text-3xl">{icon}</span>
            <div class="flex flex-col">
                <span class="text-2xl font-bold">{value}</span>
                <span class="text-gray-400 text-sm">{label}</span>
            </div>
        </div>
    }
}

/// Total equipment and the three averages of a dataset
#[component]
pub fn SummaryCards(summary: DatasetSummary) -> impl IntoView {
    view! {
        <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
            <StatCard icon="🔧" label="Total Equipment" value=summary.total_equipment.to_string() />
            <StatCard icon="💨" label="Avg Flowrate" value=summary.avg_flowrate.to_string() />
            <StatCard icon="🎚️" label="Avg Pressure" value=summary.avg_pressure.to_string() />
            <StatCard icon="🌡️" label="Avg Temperature" value=summary.avg_temperature.to_string() />
        </div>
    }
}
