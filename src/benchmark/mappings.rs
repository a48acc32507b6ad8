use super::CategoryMapping;

/// Card-issuer categories and the Consumer Expenditure Survey lines they are
/// compared against. The first entry of each list is the primary reference.
const DEFAULT_MAPPING: &[(&str, &[&str])] = &[
    (
        "Supermarkets",
        &[
            "Food away from home",
            "Food prepared by consumer unit on out of town trips",
        ],
    ),
    (
        "Groceries",
        &[
            "Food away from home",
            "Food prepared by consumer unit on out of town trips",
        ],
    ),
    ("Restaurants", &["Food away from home"]),
    ("Fast Food", &["Food away from home"]),
    ("Gasoline", &["Gasoline"]),
    ("Uber", &["Public and other transportation"]),
    ("Public Transit", &["Public and other transportation"]),
    (
        "Rent",
        &[
            "Rented dwellings",
            "Estimated monthly rental value of owned home",
        ],
    ),
    (
        "Utilities",
        &[
            "Utilities, fuels, and public services",
            "Natural gas",
            "Electricity",
            "Water and other public services",
        ],
    ),
    ("Clothing", &["Apparel and services"]),
    (
        "Medical",
        &[
            "Healthcare",
            "Health insurance",
            "Medical services",
            "Drugs",
            "Medical supplies",
        ],
    ),
    ("Doctor", &["Medical services"]),
    ("Pharmacy", &["Drugs", "Medical supplies"]),
    ("Movies", &["Entertainment", "Fees and admissions"]),
    (
        "Streaming",
        &["Entertainment", "Audio and visual equipment and services"],
    ),
    ("Haircut", &["Personal care products and services"]),
    ("Salon", &["Personal care products and services"]),
    ("Tuition", &["Education"]),
    ("Books", &["Reading", "Education"]),
    ("Other", &["Miscellaneous"]),
    (
        "Services",
        &["Personal care products and services", "Household operations"],
    ),
    (
        "Merchandise",
        &[
            "Apparel and services",
            "Household furnishings and equipment",
            "Pets, toys, hobbies, and playground equipment",
        ],
    ),
    (
        "Travel/ Entertainment",
        &[
            "Entertainment",
            "Fees and admissions",
            "Other lodging",
            "Food prepared by consumer unit on out of town trips",
        ],
    ),
];

pub(crate) fn default_category_mapping() -> CategoryMapping {
    DEFAULT_MAPPING
        .iter()
        .map(|(user, refs)| {
            (
                user.to_string(),
                refs.iter().map(|r| r.to_string()).collect(),
            )
        })
        .collect()
}
