//! Literal starter content for the template files.
//!
//! Kept as plain data: nothing here is parameterised.

pub const INDEX_ROUTES: &str = r#"import { Router } from 'express';
const router = Router();

// Default route
router.get('/', (req, res) => {
    res.send('Hello World');
});

export default router;
"#;

pub const APP: &str = r#"import express from 'express';
import indexRoutes from './routes/index.js';

const app = express();

// Middleware
app.use(express.json());

// Routes
app.use('/', indexRoutes);

export default app;
"#;

pub const SERVER: &str = r#"import app from './app.js';

const PORT = process.env.PORT || 3000;

app.listen(PORT, () => {
    console.log(`Server is running on http://localhost:${PORT}`);
});
"#;

pub const ENV: &str = "PORT=3000
DATABASE_URL=your_database_url_here
SECRET_KEY=your_secret_key_here
";

pub const GITIGNORE: &str = "# Dependencies
node_modules/

# Environment
.env
.env.local

# Logs
logs/
*.log
npm-debug.log*
yarn-debug.log*
yarn-error.log*

# Build output
dist/
build/
coverage/

# OS / editor
.DS_Store
Thumbs.db
.vscode/
.idea/
";
