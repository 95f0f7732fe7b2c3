//! Reference corpus — the fixed set of candidate context texts.
//!
//! Known at build time, embedded once at startup, never mutated. Each
//! entry's position is its stable index for the process lifetime.

/// Candidate contexts matched against incoming queries.
pub const DEFAULT_CONTEXTS: &[&str] = &[
    "Paris is the capital of France. It is known for the Eiffel Tower, the Louvre museum, and its role as a political and cultural center of Europe.",
    "The sun is a star at the center of the solar system. It is a nearly perfect sphere of hot plasma and provides the energy that sustains life on Earth.",
    "Photosynthesis is the process by which green plants convert sunlight, water, and carbon dioxide into glucose and oxygen using chlorophyll.",
    "The Great Wall of China is a series of fortifications built across the historical northern borders of ancient Chinese states, stretching thousands of kilometers.",
    "Water boils at 100 degrees Celsius at standard atmospheric pressure. The boiling point decreases as altitude increases because air pressure drops.",
    "William Shakespeare was an English playwright and poet, widely regarded as the greatest writer in the English language. His works include Hamlet, Macbeth, and Romeo and Juliet.",
    "The human heart is a muscular organ that pumps blood through the circulatory system. It beats roughly 100,000 times per day.",
    "Mount Everest is Earth's highest mountain above sea level, located in the Himalayas on the border between Nepal and China.",
];

/// Owned copy of the default corpus, in index order.
pub fn default_corpus() -> Vec<String> {
    DEFAULT_CONTEXTS.iter().map(|s| s.to_string()).collect()
}
