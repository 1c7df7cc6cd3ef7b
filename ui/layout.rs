use html::{component, html};

#[component]
pub fn S1() {
	html! {
		<div class="s1">
			{children}
		</div>
	}
}

#[component]
pub fn S2() {
	html! {
		<div class="s2">{children}</div>
	}
}

#[component]
pub fn H1() {
	html! {
		<h1 class="h1">{children}</h1>
	}
}

#[component]
pub fn P() {
	html! {
		<p class="p">{children}</p>
	}
}

/// Lays its children out in two equal columns on wide screens.
#[component]
pub fn Columns() {
	html! {
		<div class="columns">{children}</div>
	}
}
