//! Built-in specimen roster.

use super::model::Specimen;

/// Returns the fixed roster every session starts from, in display order.
pub fn builtin_specimens() -> Vec<Specimen> {
    vec![
        Specimen::builtin(
            "Derrick",
            "https://i.ytimg.com/vi/nlGcISxjCLs/hq720.jpg",
            "Danglets Derrick",
            "A gritty 1980s street-ball enforcer in Hawkins. Wearing a distressed letterman jacket, chewing a toothpick with a menacing glare.",
        ),
        Specimen::builtin(
            "Eleven",
            "https://static0.gamerantimages.com/wordpress/wp-content/uploads/2022/07/Stranger-Things-Eleven-Featured-Image.jpg",
            "Ethereal Eleven",
            "A haunting 1920s pictorialist portrait. Shaved head, dressed in delicate lace, surrounded by an inexplicable silver mist.",
        ),
        Specimen::builtin(
            "Mike",
            "https://upload.wikimedia.org/wikipedia/pt/e/e7/Mike-Wheeler-S3.jpg",
            "Mighty Mike",
            "A 1940s film noir detective. Bowl cut visible under a tilted fedora, wearing a heavy wool trench coat.",
        ),
        Specimen::builtin(
            "Dustin",
            "https://static.wikia.nocookie.net/strangerthings8338/images/b/bf/Dustin_S5.jpg/revision/latest",
            "Dashing Dustin",
            "A Renaissance scholar with a wide grin. Dressed in fine velvet with a brass compass in hand.",
        ),
        Specimen::builtin(
            "Steve",
            "https://upload.wikimedia.org/wikipedia/commons/2/22/Joe_Keery_by_Gage_Skidmore.jpg",
            "Sovereign Steve",
            "An 18th-century French aristocrat. Elaborate lace collar, perfectly coiffed hair, wielding a silver-handled cane.",
        ),
        Specimen::builtin(
            "Nancy",
            "https://miro.medium.com/v2/resize:fit:1400/0*H0er7fOPkcX-eiKq",
            "Noble Nancy",
            "A Victorian journalist in London. High-necked silk blouse, clutching a notebook by gaslight.",
        ),
        Specimen::builtin(
            "Lucas",
            "https://static.wikia.nocookie.net/strangerthings8338/images/b/b4/Lucas_S4.png/revision/latest",
            "Luminous Lucas",
            "A 1960s photojournalist. Wearing a military-style utility vest, Nikon camera around his neck.",
        ),
        Specimen::builtin(
            "Eddie",
            "https://images.immediate.co.uk/production/volatile/sites/3/2022/06/Joseph-Quinn-Stranger-Things-Eddie-Munson-6f29947.jpg",
            "Eccentric Eddie",
            "A 19th-century bohemian bard. Patchwork velvet coat, wild hair, playing a lute in a torch-lit tavern.",
        ),
        Specimen::builtin(
            "Will",
            "https://townsquare.media/site/252/files/2022/07/attachment-will-byers.jpg",
            "Wistful Will",
            "A 1930s Dust Bowl survivor. Faded denim overalls, sepia-toned landscape, quiet resilience.",
        ),
        Specimen::builtin(
            "Max",
            "https://static.wikia.nocookie.net/strangerthings8338/images/7/73/Max_Mayfield_-_S3.png/revision/latest",
            "Meticulous Max",
            "A modern-day architectural prodigy. Minimalist black attire, standing in a brutalist concrete gallery.",
        ),
    ]
}
