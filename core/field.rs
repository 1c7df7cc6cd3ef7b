/*!
This module defines the eight measurements collected by the prediction form, along with the bounds, defaults and step sizes of their inputs.
*/

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
	Pregnancies,
	Glucose,
	BloodPressure,
	SkinThickness,
	Insulin,
	Bmi,
	DiabetesPedigreeFunction,
	Age,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
	Integer,
	Decimal,
}

/// The form renders its fields in two columns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldColumn {
	Left,
	Right,
}

#[derive(Debug)]
pub struct FieldSpec {
	/// The name of the form input.
	pub name: &'static str,
	pub label: &'static str,
	pub kind: FieldKind,
	pub min: f64,
	pub max: f64,
	pub default: f64,
	pub step: f64,
	/// The number of digits shown after the decimal point.
	pub decimals: usize,
	pub column: FieldColumn,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue {
	Integer(i64),
	Decimal(f64),
}

const FIELDS: [Field; 8] = [
	Field::Pregnancies,
	Field::Glucose,
	Field::BloodPressure,
	Field::SkinThickness,
	Field::Insulin,
	Field::Bmi,
	Field::DiabetesPedigreeFunction,
	Field::Age,
];

static PREGNANCIES: FieldSpec = FieldSpec {
	name: "pregnancies",
	label: "Pregnancies",
	kind: FieldKind::Integer,
	min: 0.0,
	max: 17.0,
	default: 6.0,
	step: 1.0,
	decimals: 0,
	column: FieldColumn::Left,
};

static GLUCOSE: FieldSpec = FieldSpec {
	name: "glucose",
	label: "Glucose (mg/dL)",
	kind: FieldKind::Decimal,
	min: 0.0,
	max: 199.0,
	default: 148.0,
	step: 0.1,
	decimals: 1,
	column: FieldColumn::Right,
};

static BLOOD_PRESSURE: FieldSpec = FieldSpec {
	name: "blood_pressure",
	label: "Blood Pressure (mmHg)",
	kind: FieldKind::Decimal,
	min: 0.0,
	max: 122.0,
	default: 72.0,
	step: 0.1,
	decimals: 1,
	column: FieldColumn::Left,
};

static SKIN_THICKNESS: FieldSpec = FieldSpec {
	name: "skin_thickness",
	label: "Skin Thickness (mm)",
	kind: FieldKind::Decimal,
	min: 0.0,
	max: 99.0,
	default: 35.0,
	step: 0.1,
	decimals: 1,
	column: FieldColumn::Right,
};

static INSULIN: FieldSpec = FieldSpec {
	name: "insulin",
	label: "Insulin (µU/mL)",
	kind: FieldKind::Decimal,
	min: 0.0,
	max: 846.0,
	default: 0.0,
	step: 0.1,
	decimals: 1,
	column: FieldColumn::Left,
};

static BMI: FieldSpec = FieldSpec {
	name: "bmi",
	label: "BMI",
	kind: FieldKind::Decimal,
	min: 0.0,
	max: 67.1,
	default: 33.6,
	step: 0.1,
	decimals: 1,
	column: FieldColumn::Right,
};

static DIABETES_PEDIGREE_FUNCTION: FieldSpec = FieldSpec {
	name: "diabetes_pedigree",
	label: "Diabetes Pedigree Function",
	kind: FieldKind::Decimal,
	min: 0.078,
	max: 2.420,
	default: 0.627,
	step: 0.001,
	decimals: 3,
	column: FieldColumn::Left,
};

static AGE: FieldSpec = FieldSpec {
	name: "age",
	label: "Age (years)",
	kind: FieldKind::Integer,
	min: 21.0,
	max: 81.0,
	default: 50.0,
	step: 1.0,
	decimals: 0,
	column: FieldColumn::Right,
};

impl Field {
	/// All fields in form order.
	pub fn all() -> &'static [Field] {
		&FIELDS
	}

	pub fn spec(self) -> &'static FieldSpec {
		match self {
			Field::Pregnancies => &PREGNANCIES,
			Field::Glucose => &GLUCOSE,
			Field::BloodPressure => &BLOOD_PRESSURE,
			Field::SkinThickness => &SKIN_THICKNESS,
			Field::Insulin => &INSULIN,
			Field::Bmi => &BMI,
			Field::DiabetesPedigreeFunction => &DIABETES_PEDIGREE_FUNCTION,
			Field::Age => &AGE,
		}
	}

	pub fn from_name(name: &str) -> Option<Field> {
		Field::all()
			.iter()
			.copied()
			.find(|field| field.spec().name == name)
	}

	pub fn default_value(self) -> FieldValue {
		let spec = self.spec();
		match spec.kind {
			FieldKind::Integer => FieldValue::Integer(spec.default as i64),
			FieldKind::Decimal => FieldValue::Decimal(spec.default),
		}
	}
}

impl std::fmt::Display for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.spec().label)
	}
}

impl FieldSpec {
	pub fn contains(&self, value: f64) -> bool {
		(self.min..=self.max).contains(&value)
	}

	/// Render a value with this field's number of decimals, the way the form displays it.
	pub fn format(&self, value: FieldValue) -> String {
		match value {
			FieldValue::Integer(value) => value.to_string(),
			FieldValue::Decimal(value) => format!("{:.1$}", value, self.decimals),
		}
	}

	pub fn format_min(&self) -> String {
		format!("{:.1$}", self.min, self.decimals)
	}

	pub fn format_max(&self) -> String {
		format!("{:.1$}", self.max, self.decimals)
	}

	pub fn format_step(&self) -> String {
		format!("{:.1$}", self.step, self.decimals)
	}
}

impl FieldValue {
	pub fn as_f64(self) -> f64 {
		match self {
			FieldValue::Integer(value) => value as f64,
			FieldValue::Decimal(value) => value,
		}
	}

	pub fn to_json(self) -> pima_deps::serde_json::Value {
		match self {
			FieldValue::Integer(value) => value.into(),
			FieldValue::Decimal(value) => value.into(),
		}
	}
}
