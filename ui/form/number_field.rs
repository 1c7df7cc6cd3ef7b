use super::FieldLabel;
use html::{component, html};

/// A bounded numeric input. The browser enforces `min`, `max` and `step`, the server checks the bounds again on submission.
#[component]
pub fn NumberField(
	label: String,
	name: String,
	min: String,
	max: String,
	step: String,
	value: String,
) {
	html! {
		<FieldLabel html_for={name.clone()}>
			{label}
			<input
				class="form-number-field"
				id={name.clone()}
				inputmode="decimal"
				max={max}
				min={min}
				name={name}
				required={true}
				step={step}
				type="number"
				value={value}
			/>
		</FieldLabel>
	}
}
