use html::{component, html};

#[component]
pub fn SubmitButton(id: Option<String>) {
	html! {
		<button class="button" id={id} type="submit">
			{children}
		</button>
	}
}
