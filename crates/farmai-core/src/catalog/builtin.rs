//! Built-in crop and livestock catalog.

use crate::models::{Condition, SubjectKind};

use super::DiseaseCatalog;

const CROPS: &[(&str, &str)] = &[
    ("coffee", "Coffee"),
    ("tea", "Tea"),
    ("maize", "Maize"),
    ("wheat", "Wheat"),
    ("beans", "Beans"),
    ("groundnuts", "Groundnuts"),
    ("banana", "Banana"),
    ("okra", "Okra"),
    ("tomato", "Tomato"),
    ("cassava", "Cassava"),
];

const ANIMALS: &[(&str, &str)] = &[
    ("cow", "Cow"),
    ("sheep", "Sheep"),
    ("goat", "Goat"),
    ("chicken", "Chicken"),
    ("duck", "Duck"),
];

const IMAGE_BASE: &str = "https://images.unsplash.com";
const IMAGE_PARAMS: &str = "ixlib=rb-1.2.1&auto=format&fit=crop&w=1000&q=80";

fn photo(id: &str) -> String {
    format!("{}/{}?{}", IMAGE_BASE, id, IMAGE_PARAMS)
}

pub(super) fn catalog() -> DiseaseCatalog {
    let mut builder = DiseaseCatalog::builder();
    for (key, label) in CROPS {
        builder = builder.subject(key, label, SubjectKind::Crop);
    }
    for (key, label) in ANIMALS {
        builder = builder.subject(key, label, SubjectKind::Animal);
    }

    builder
        // ------------------------------------------------------------------
        // Coffee
        // ------------------------------------------------------------------
        .condition(
            "coffee",
            Condition::new("coffee-leaf-rust", "Coffee Leaf Rust")
                .with_scientific_name("Hemileia vastatrix")
                .with_symptoms(&[
                    "Orange-yellow powdery spots on the underside of leaves",
                    "Yellow spots on the upper surface of leaves",
                    "Premature leaf drop",
                    "Reduced yield and quality",
                ])
                .with_treatment(&[
                    "Apply copper-based fungicides",
                    "Plant rust-resistant coffee varieties",
                    "Maintain proper spacing between plants for good air circulation",
                    "Remove and destroy infected leaves",
                ])
                .with_reference_image(&photo("photo-1559741033-d85618ce7e8c")),
        )
        .condition(
            "coffee",
            Condition::new("coffee-berry-disease", "Coffee Berry Disease")
                .with_scientific_name("Colletotrichum kahawae")
                .with_symptoms(&[
                    "Dark, sunken lesions on green berries",
                    "Premature fruit drop",
                    "Mummified berries",
                    "Reduced yield",
                ])
                .with_treatment(&[
                    "Apply fungicides preventatively",
                    "Plant resistant varieties",
                    "Prune coffee trees to improve air circulation",
                    "Maintain field hygiene by removing infected berries",
                ])
                .with_reference_image(&photo("photo-1610889556528-9a770e32642f")),
        )
        // ------------------------------------------------------------------
        // Maize
        // ------------------------------------------------------------------
        .condition(
            "maize",
            Condition::new("maize-northern-leaf-blight", "Northern Leaf Blight")
                .with_scientific_name("Exserohilum turcicum")
                .with_symptoms(&[
                    "Long, elliptical gray-green or tan lesions on leaves",
                    "Lesions become tan-brown as they mature",
                    "Lesions may coalesce to blight entire leaves",
                    "Lower leaves are affected first",
                ])
                .with_treatment(&[
                    "Plant resistant hybrids",
                    "Apply fungicides if economically feasible",
                    "Rotate crops with non-host plants",
                    "Practice good field sanitation",
                ])
                .with_prevention(&["Crop rotation", "Plant resistant varieties"])
                .with_reference_image(&photo("photo-1530468515069-8bbe68913a91")),
        )
        .condition(
            "maize",
            Condition::new("maize-common-rust", "Common Rust")
                .with_scientific_name("Puccinia sorghi")
                .with_symptoms(&[
                    "Small, circular to elongated cinnamon-brown pustules on both leaf surfaces",
                    "Pustules turn black as the plant matures",
                    "Severe infections cause leaf yellowing and death",
                    "Reduced grain fill and yield",
                ])
                .with_treatment(&[
                    "Plant resistant hybrids",
                    "Apply fungicides early in the season",
                    "Monitor fields regularly",
                    "Maintain proper plant nutrition",
                ])
                .with_reference_image(&photo("photo-1601329098780-c2e9cdd7c8d9")),
        )
        // ------------------------------------------------------------------
        // Tomato
        // ------------------------------------------------------------------
        .condition(
            "tomato",
            Condition::new("tomato-late-blight", "Late Blight")
                .with_scientific_name("Phytophthora infestans")
                .with_symptoms(&[
                    "Dark, water-soaked lesions on leaves",
                    "White, fuzzy growth on undersides of leaves",
                    "Brown lesions on stems",
                    "Firm, dark, greasy spots on fruits",
                ])
                .with_treatment(&[
                    "Apply fungicides preventatively",
                    "Plant resistant varieties",
                    "Avoid overhead irrigation",
                    "Remove and destroy infected plants",
                    "Ensure good air circulation",
                ])
                .with_reference_image(&photo("photo-1592985684811-6c0f98adb014")),
        )
        .condition(
            "tomato",
            Condition::new("tomato-early-blight", "Early Blight")
                .with_scientific_name("Alternaria solani")
                .with_symptoms(&[
                    "Dark, concentric rings on lower leaves",
                    "Yellowing around the lesions",
                    "Premature leaf drop",
                    "Sunken, leathery spots on fruits",
                ])
                .with_treatment(&[
                    "Apply fungicides at first sign of disease",
                    "Practice crop rotation",
                    "Remove lower infected leaves",
                    "Mulch around plants",
                    "Ensure adequate plant spacing",
                ])
                .with_reference_image(&photo("photo-1592576125572-18c93540e450")),
        )
        // ------------------------------------------------------------------
        // Cow
        // ------------------------------------------------------------------
        .condition(
            "cow",
            Condition::new("cow-mastitis", "Mastitis")
                .with_symptoms(&[
                    "Swollen udder",
                    "Painful udder",
                    "Abnormal milk",
                    "Reduced milk",
                    "Fever",
                ])
                .with_treatment(&[
                    "Isolate affected animals",
                    "Administer antibiotics as prescribed by veterinarian",
                    "Frequent milking of affected quarters",
                    "Apply warm compresses",
                    "Ensure clean housing conditions",
                ])
                .with_prevention(&[
                    "Maintain clean milking equipment",
                    "Practice good hygiene during milking",
                    "Regularly check udder health",
                    "Cull chronically infected cows",
                    "Proper nutrition and housing",
                ])
                .with_reference_image(&photo("photo-1570042225831-d98fa7577f1e")),
        )
        .condition(
            "cow",
            Condition::new("cow-foot-and-mouth", "Foot and Mouth Disease")
                .with_symptoms(&[
                    "Fever",
                    "Blisters on tongue, lips, mouth, teats, and feet",
                    "Excessive salivation",
                    "Lameness",
                    "Reduced feed intake and milk production",
                ])
                .with_treatment(&[
                    "No specific treatment available",
                    "Supportive care: soft food, clean water",
                    "Anti-inflammatory medications for comfort",
                    "Foot baths for affected hooves",
                    "Notify authorities immediately (reportable disease)",
                ])
                .with_prevention(&[
                    "Regular vaccination",
                    "Strict biosecurity measures",
                    "Control movement of animals",
                    "Quarantine new animals",
                    "Disinfect equipment and vehicles",
                ])
                .with_reference_image(&photo("photo-1596733430284-f7437764b1a9")),
        )
        // ------------------------------------------------------------------
        // Chicken
        // ------------------------------------------------------------------
        .condition(
            "chicken",
            Condition::new("chicken-newcastle", "Newcastle Disease")
                .with_symptoms(&[
                    "Respiratory distress (gasping, coughing)",
                    "Nervous signs (tremors, twisted neck, paralysis)",
                    "Greenish diarrhea",
                    "Drop in egg production",
                    "Sudden death",
                ])
                .with_treatment(&[
                    "No specific treatment",
                    "Supportive care with antibiotics to prevent secondary infections",
                    "Electrolytes in water",
                    "Isolate affected birds",
                    "Notify authorities (reportable disease)",
                ])
                .with_prevention(&[
                    "Regular vaccination",
                    "Strict biosecurity measures",
                    "Control wild bird access to poultry",
                    "Proper disposal of dead birds",
                    "Clean and disinfect housing regularly",
                ])
                .with_reference_image(&photo("photo-1548550023-2bdb3c5beed7")),
        )
        .condition(
            "chicken",
            Condition::new("chicken-coccidiosis", "Coccidiosis")
                .with_symptoms(&[
                    "Bloody diarrhea",
                    "Ruffled feathers",
                    "Weight loss",
                    "Pale combs and wattles",
                    "Reduced feed intake",
                ])
                .with_treatment(&[
                    "Anticoccidial medications in feed or water",
                    "Supportive care with vitamins and electrolytes",
                    "Improve housing conditions",
                    "Separate affected birds",
                    "Clean and disinfect housing",
                ])
                .with_prevention(&[
                    "Use anticoccidial medications preventatively",
                    "Maintain dry litter conditions",
                    "Avoid overcrowding",
                    "Practice good sanitation",
                    "Rotate anticoccidial drugs to prevent resistance",
                ])
                .with_reference_image(&photo("photo-1569317082982-25b5e490b147")),
        )
        .build()
}
