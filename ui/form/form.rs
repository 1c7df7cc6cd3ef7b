use html::{component, html};

/// A form that posts back to the page that rendered it.
#[component]
pub fn Form(id: Option<String>) {
	html! {
		<form class="form" id={id} method="post">
			{children}
		</form>
	}
}
