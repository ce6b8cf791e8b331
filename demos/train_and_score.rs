use perceptrs::train::{Averaged, Decoder, FeatureExtractor, Perceptron, Scorer};
use perceptrs::{Decoded, Feature, Model};

type Tagged = Decoded<Vec<String>, Vec<String>>;

const TAGS: [&str; 2] = ["sunny", "rainy"];

struct WordTag;

impl FeatureExtractor<Tagged> for WordTag {
    fn features(&self, decoded: &Tagged) -> Vec<Feature> {
        let mut prev = "<s>";
        let mut features = Vec::new();
        for (word, tag) in decoded.instance.iter().zip(&decoded.output) {
            features.push(Feature::from(format!("w={}|t={}", word, tag)));
            features.push(Feature::from(format!("p={}|t={}", prev, tag)));
            prev = tag;
        }
        features
    }

    fn estimated_num_features(&self) -> usize {
        64
    }
}

/// Greedy left-to-right tagging
struct Greedy;

impl Decoder<Tagged> for Greedy {
    fn decode(&self, words: &Vec<String>, scorer: &dyn Scorer<Tagged>) -> Tagged {
        let mut tags: Vec<String> = Vec::with_capacity(words.len());
        for i in 0..words.len() {
            let mut best: Option<(f64, &str)> = None;
            for tag in TAGS {
                let mut prefix = tags.clone();
                prefix.push(tag.to_string());
                let candidate = Decoded::new(words[..=i].to_vec(), prefix);
                let score = scorer.score(&candidate);
                if best.map_or(true, |(s, _)| score > s) {
                    best = Some((score, tag));
                }
            }
            if let Some((_, tag)) = best {
                tags.push(tag.to_string());
            }
        }
        Decoded::new(words.clone(), tags)
    }
}

fn sentence(words: &[&str], tags: &[&str]) -> Tagged {
    Decoded::new(
        words.iter().map(|s| s.to_string()).collect(),
        tags.iter().map(|s| s.to_string()).collect(),
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let corpus = vec![
        sentence(&["walk", "shop"], &["sunny", "sunny"]),
        sentence(&["clean", "clean"], &["rainy", "rainy"]),
        sentence(&["walk", "clean"], &["sunny", "rainy"]),
        sentence(&["clean", "walk", "shop"], &["rainy", "sunny", "sunny"]),
    ];
    let epochs = 5;

    let mut model = Perceptron::new(Greedy).with_iterations(epochs)?;
    model.init(WordTag, Averaged::new());
    let stream = (0..epochs).flat_map(|_| corpus.clone());
    let summary = model.train(stream);
    println!(
        "Trained on {} instances, {} mistakes",
        summary.instances, summary.mistakes
    );

    let test = sentence(&["shop", "clean", "walk"], &["sunny", "rainy", "sunny"]);
    let predicted = Greedy.decode(&test.instance, &model);
    println!("Input: {:?}", test.instance);
    println!("Predicted labels: {:?}", predicted.output);

    let model_path = std::env::temp_dir().join("example_model.perceptron");
    model.save(&model_path)?;
    let data = std::fs::read(&model_path)?;
    Model::new(&data)?.dump(&mut std::io::stdout())?;

    Ok(())
}
